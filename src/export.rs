use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::chart::Charts;

/// Write the three chart specifications as pretty-printed JSON.
pub fn write_charts(path: &Path, charts: &Charts) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, charts).context("serialising charts")?;
    writer.flush().context("flushing export file")?;
    log::info!("Exported charts to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::resolve;
    use crate::data::model::tests::sample_table;
    use crate::selector::SelectorState;

    #[test]
    fn export_writes_all_three_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");
        let charts = resolve(&SelectorState::default(), &sample_table());

        write_charts(&path, &charts).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["comparison"]["kind"]["type"], "violin");
        assert_eq!(json["comparison"]["kind"]["feature"], "balance");
        assert_eq!(json["distribution"]["kind"]["type"], "empty");
        assert_eq!(json["segment"]["kind"]["type"], "empty");
        assert_eq!(json["segment"]["x_label"], "x");
    }
}
