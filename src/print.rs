//! Non-interactive output for `--print` and `--json`.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use pathtree::error::Result;
use pathtree::panel::Panel;
use pathtree::tree::{row_prefix, StatusCode, TreeNode};

#[derive(Serialize)]
struct PanelDump<'a> {
    title: &'a str,
    query: &'a str,
    nodes: &'a [TreeNode],
    folder_status: BTreeMap<&'a str, StatusCode>,
}

/// Write each panel's visible rows as a box-drawn outline.
pub fn write_text<W: Write>(panels: &[&Panel], out: &mut W) -> Result<()> {
    for (i, panel) in panels.iter().enumerate() {
        if panels.len() > 1 {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", panel.title())?;
        }
        let rows = panel.rows();
        for (index, row) in rows.iter().enumerate() {
            let status = row.status.map(|c| c.as_char()).unwrap_or(' ');
            let slash = if row.is_folder { "/" } else { "" };
            writeln!(out, "{} {} {}{}", row_prefix(rows, index), status, row.name, slash)?;
        }
    }
    Ok(())
}

/// Write the displayed tree and folder statuses of each panel as a JSON array.
pub fn write_json<W: Write>(panels: &[&Panel], out: &mut W) -> Result<()> {
    let dumps: Vec<PanelDump> = panels
        .iter()
        .map(|panel| PanelDump {
            title: panel.title(),
            query: panel.query(),
            nodes: &panel.tree().nodes,
            folder_status: panel
                .folder_status()
                .iter()
                .map(|(path, code)| (path.as_str(), *code))
                .collect(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &dumps)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtree::tree::PathEntry;

    fn panel() -> Panel {
        let mut panel = Panel::new("Changes");
        panel.set_entries(vec![
            PathEntry::with_status("src/app.rs", StatusCode::Modified),
            PathEntry::new("README.md"),
        ]);
        panel.expand_all();
        panel
    }

    #[test]
    fn text_output_is_an_outline() {
        let panel = panel();
        let mut out = Vec::new();
        write_text(&[&panel], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "├── M src/\n│  └── M app.rs\n└──   README.md\n");
    }

    #[test]
    fn text_output_heads_each_panel_when_several() {
        let a = panel();
        let b = Panel::new("Empty");
        let mut out = Vec::new();
        write_text(&[&a, &b], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Changes\n"));
        assert!(text.ends_with("\nEmpty\n"));
    }

    #[test]
    fn json_output_carries_nodes_and_statuses() {
        let panel = panel();
        let mut out = Vec::new();
        write_json(&[&panel], &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let dump = &value[0];
        assert_eq!(dump["title"], "Changes");
        assert_eq!(dump["folder_status"]["src"], "M");
        assert_eq!(dump["nodes"][0]["kind"], "folder");
        assert_eq!(dump["nodes"][0]["children"][0]["path"], "src/app.rs");
        assert_eq!(dump["nodes"][1]["kind"], "file");
    }
}
