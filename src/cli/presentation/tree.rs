//! Tree presentation: box-drawn text and nested JSON.

use crate::error::ApiError;
use crate::tree::path::qualified;
use crate::tree::{TreeNodeId, TreeView};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

pub fn format_tree_text(tree: &TreeView, color: bool) -> String {
    let mut lines = Vec::new();
    for &root in tree.roots() {
        if let Some(node) = tree.get(root) {
            if color {
                lines.push(format!("{}", node.label.bold()));
            } else {
                lines.push(node.label.clone());
            }
            render_children(tree, root, "", color, &mut lines);
        }
    }

    if !tree.skipped().is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({}):", tree.skipped().len()));
        for skip in tree.skipped() {
            let line = format!("  {}: {}", qualified(skip.root, &skip.path), skip.reason);
            if color {
                lines.push(format!("{}", line.yellow()));
            } else {
                lines.push(line);
            }
        }
    }
    lines.join("\n")
}

fn render_children(
    tree: &TreeView,
    id: TreeNodeId,
    prefix: &str,
    color: bool,
    lines: &mut Vec<String>,
) {
    let children = tree.children(id);
    for (i, &child) in children.iter().enumerate() {
        let Some(node) = tree.get(child) else { continue };
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        let label = if !node.expanded && color {
            format!("{}", node.label.dimmed())
        } else {
            node.label.clone()
        };
        lines.push(format!("{}{}{}", prefix, branch, label));
        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(tree, child, &next, color, lines);
    }
}

pub fn format_tree_json(tree: &TreeView) -> Result<String, ApiError> {
    let roots: Vec<Value> = tree.roots().iter().map(|&id| node_json(tree, id)).collect();
    let skipped: Vec<Value> = tree
        .skipped()
        .iter()
        .map(|s| json!({ "key": qualified(s.root, &s.path), "reason": s.reason }))
        .collect();
    let out = json!({
        "max_depth": tree.max_depth(),
        "roots": roots,
        "skipped": skipped,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

fn node_json(tree: &TreeView, id: TreeNodeId) -> Value {
    match tree.get(id) {
        Some(node) => json!({
            "name": node.label,
            "key": qualified(node.node.root, &node.node.path),
            "expanded": node.expanded,
            "children": tree
                .children(id)
                .iter()
                .map(|&c| node_json(tree, c))
                .collect::<Vec<_>>(),
        }),
        None => Value::Null,
    }
}
