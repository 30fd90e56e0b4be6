use crate::selector::SelectorId;

/// Identifier of a graph area on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphId {
    Comparison,
    Distribution,
    Segment,
}

impl GraphId {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphId::Comparison => "comparison-graph",
            GraphId::Distribution => "distribution-graph",
            GraphId::Segment => "segment-graph",
        }
    }
}

/// A column inside a row: heading, its dropdowns and the graph they drive.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Share of the row on a 12-column grid.
    pub width: u8,
    pub heading: &'static str,
    pub selectors: Vec<SelectorId>,
    pub graph: GraphId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub panels: Vec<Panel>,
}

/// Static description of the whole page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

impl PageLayout {
    #[cfg(test)]
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.rows.iter().flat_map(|r| r.panels.iter())
    }
}

/// Build the dashboard page: comparison and distribution side by side,
/// segmentation full width underneath.
pub fn page_layout() -> PageLayout {
    PageLayout {
        title: "Análisis de Clientes",
        rows: vec![
            Row {
                panels: vec![
                    Panel {
                        width: 6,
                        heading: "Seleccione la característica para comparar entre clientes que compraron y no compraron",
                        selectors: vec![SelectorId::Comparison],
                        graph: GraphId::Comparison,
                    },
                    Panel {
                        width: 6,
                        heading: "Distribución de características seleccionadas",
                        selectors: vec![SelectorId::XAxis, SelectorId::Color],
                        graph: GraphId::Distribution,
                    },
                ],
            },
            Row {
                panels: vec![Panel {
                    width: 12,
                    heading: "Segmentación de Clientes",
                    selectors: vec![SelectorId::Segment],
                    graph: GraphId::Segment,
                }],
            },
        ],
    }
}
