use crate::data::model::Field;
use crate::error::InvalidSelectorValue;

// ---------------------------------------------------------------------------
// Selector identifiers and their option lists
// ---------------------------------------------------------------------------

/// One entry of a dropdown: the text shown and the field it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorOption {
    pub label: &'static str,
    pub value: Field,
}

const fn opt(label: &'static str, value: Field) -> SelectorOption {
    SelectorOption { label, value }
}

const COMPARISON_OPTIONS: &[SelectorOption] = &[
    opt("Balance", Field::Balance),
    opt("Edad", Field::Age),
    opt("Duración de la Llamada", Field::Duration),
];

const DISTRIBUTION_OPTIONS: &[SelectorOption] = &[
    opt("Ocupación", Field::Job),
    opt("Estado Civil", Field::Marital),
    opt("Educación", Field::Education),
    opt("Balance", Field::Balance),
];

const SEGMENT_OPTIONS: &[SelectorOption] = &[
    opt("Ocupación", Field::Job),
    opt("Estado Civil", Field::Marital),
    opt("Nivel Educativo", Field::Education),
    opt("Balance", Field::Balance),
];

/// The four dropdowns of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorId {
    Comparison,
    XAxis,
    Color,
    Segment,
}

impl SelectorId {
    /// Stable element identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorId::Comparison => "feature-dropdown",
            SelectorId::XAxis => "x-axis-dropdown",
            SelectorId::Color => "color-dropdown",
            SelectorId::Segment => "segment-filter",
        }
    }

    pub fn options(self) -> &'static [SelectorOption] {
        match self {
            SelectorId::Comparison => COMPARISON_OPTIONS,
            SelectorId::XAxis | SelectorId::Color => DISTRIBUTION_OPTIONS,
            SelectorId::Segment => SEGMENT_OPTIONS,
        }
    }

    pub fn default_value(self) -> Option<Field> {
        match self {
            SelectorId::Comparison => Some(Field::Balance),
            _ => None,
        }
    }

    /// Text shown while nothing is selected.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            SelectorId::Comparison => None,
            SelectorId::XAxis => Some("Seleccione una característica para el eje X"),
            SelectorId::Color => Some("Seleccione una característica para el color"),
            SelectorId::Segment => Some("Seleccione un segmento"),
        }
    }

    /// Display label of `field` in this selector, if it is one of its options.
    pub fn label_for(self, field: Field) -> Option<&'static str> {
        self.options()
            .iter()
            .find(|o| o.value == field)
            .map(|o| o.label)
    }

    /// Parse a raw option value (`"balance"`, `"job"`, ...) against this selector's list.
    pub fn parse(self, raw: &str) -> Result<Field, InvalidSelectorValue> {
        self.options()
            .iter()
            .find(|o| o.value.column() == raw)
            .map(|o| o.value)
            .ok_or_else(|| InvalidSelectorValue {
                selector: self.as_str(),
                value: raw.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Selector state
// ---------------------------------------------------------------------------

/// Current value of every dropdown. Each is unset or one of its selector's options;
/// the setters enforce that, so the resolver never sees an out-of-range field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorState {
    comparison: Option<Field>,
    x_axis: Option<Field>,
    color: Option<Field>,
    segment: Option<Field>,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self {
            comparison: SelectorId::Comparison.default_value(),
            x_axis: SelectorId::XAxis.default_value(),
            color: SelectorId::Color.default_value(),
            segment: SelectorId::Segment.default_value(),
        }
    }
}

impl SelectorState {
    /// All four selectors unset.
    pub fn cleared() -> Self {
        Self {
            comparison: None,
            x_axis: None,
            color: None,
            segment: None,
        }
    }

    pub fn get(&self, id: SelectorId) -> Option<Field> {
        match id {
            SelectorId::Comparison => self.comparison,
            SelectorId::XAxis => self.x_axis,
            SelectorId::Color => self.color,
            SelectorId::Segment => self.segment,
        }
    }

    /// Set or clear one selector. Fields outside the selector's options are rejected.
    pub fn set(&mut self, id: SelectorId, value: Option<Field>) -> Result<(), InvalidSelectorValue> {
        if let Some(field) = value {
            if id.label_for(field).is_none() {
                return Err(InvalidSelectorValue {
                    selector: id.as_str(),
                    value: field.column().to_string(),
                });
            }
        }
        let slot = match id {
            SelectorId::Comparison => &mut self.comparison,
            SelectorId::XAxis => &mut self.x_axis,
            SelectorId::Color => &mut self.color,
            SelectorId::Segment => &mut self.segment,
        };
        *slot = value;
        Ok(())
    }

    /// Set one selector from its raw option value; `None` clears it.
    pub fn set_raw(&mut self, id: SelectorId, raw: Option<&str>) -> Result<(), InvalidSelectorValue> {
        let value = raw.map(|r| id.parse(r)).transpose()?;
        self.set(id, value)
    }

    /// Builder-style [`set`](Self::set).
    #[cfg(test)]
    pub fn with(mut self, id: SelectorId, value: Option<Field>) -> Result<Self, InvalidSelectorValue> {
        self.set(id, value)?;
        Ok(self)
    }

    pub fn comparison(&self) -> Option<Field> {
        self.comparison
    }

    pub fn x_axis(&self) -> Option<Field> {
        self.x_axis
    }

    pub fn color(&self) -> Option<Field> {
        self.color
    }

    pub fn segment(&self) -> Option<Field> {
        self.segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(id: SelectorId) -> Vec<(&'static str, &'static str)> {
        id.options()
            .iter()
            .map(|o| (o.label, o.value.column()))
            .collect()
    }

    #[test]
    fn option_lists_match_the_dashboard() {
        assert_eq!(
            values(SelectorId::Comparison),
            vec![
                ("Balance", "balance"),
                ("Edad", "age"),
                ("Duración de la Llamada", "duration"),
            ]
        );
        let distribution = vec![
            ("Ocupación", "job"),
            ("Estado Civil", "marital"),
            ("Educación", "education"),
            ("Balance", "balance"),
        ];
        assert_eq!(values(SelectorId::XAxis), distribution);
        assert_eq!(values(SelectorId::Color), distribution);
        assert_eq!(
            values(SelectorId::Segment),
            vec![
                ("Ocupación", "job"),
                ("Estado Civil", "marital"),
                ("Nivel Educativo", "education"),
                ("Balance", "balance"),
            ]
        );
    }

    #[test]
    fn default_state_selects_balance_only() {
        let state = SelectorState::default();
        assert_eq!(state.comparison(), Some(Field::Balance));
        assert_eq!(state.x_axis(), None);
        assert_eq!(state.color(), None);
        assert_eq!(state.segment(), None);
    }

    #[test]
    fn parse_accepts_enumerated_values() {
        assert_eq!(SelectorId::Comparison.parse("age"), Ok(Field::Age));
        assert_eq!(SelectorId::Segment.parse("education"), Ok(Field::Education));
    }

    #[test]
    fn out_of_set_values_are_rejected() {
        let err = SelectorId::Comparison.parse("job").unwrap_err();
        assert_eq!(err.selector, "feature-dropdown");
        assert_eq!(err.value, "job");

        let mut state = SelectorState::default();
        assert!(state.set(SelectorId::XAxis, Some(Field::Duration)).is_err());
        assert!(state.set(SelectorId::Segment, Some(Field::Outcome)).is_err());
        assert!(state.set_raw(SelectorId::Color, Some("Balance")).is_err());
        assert_eq!(state, SelectorState::default());
    }

    #[test]
    fn set_raw_clears_with_none() {
        let mut state = SelectorState::default();
        state.set_raw(SelectorId::Segment, Some("balance")).unwrap();
        assert_eq!(state.segment(), Some(Field::Balance));
        state.set_raw(SelectorId::Segment, None).unwrap();
        assert_eq!(state.segment(), None);
    }
}
