//! # Tree Command Implementation
//!
//! Displays the task tree below a library task: composites with their
//! description, leaves with their target.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::path::PathBuf;

use confsmith::meta::{task_tree, TaskNode};
use confsmith::suggestions;

use super::open_library;

/// Display the task tree below a library task
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Library directory containing task groups
    #[arg(value_name = "LIBRARY_DIR")]
    pub library: PathBuf,

    /// Root task, e.g. editor/@default
    #[arg(value_name = "TASK")]
    pub task: String,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree. Use 0 to show only the root.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let store = open_library(&args.library)?;
    let root = task_tree(&store, &args.task).map_err(suggestions::explain)?;

    let display = build_tree_node(&root, args.depth.unwrap_or(usize::MAX), 0);
    print_tree(&display).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Build a display node from a task node
fn build_tree_node(task: &TaskNode, max_depth: usize, current_depth: usize) -> DisplayNode {
    let label = format!("{} ({})", task.name, task.label);
    let children = if current_depth >= max_depth {
        Vec::new()
    } else {
        task.children
            .iter()
            .map(|child| build_tree_node(child, max_depth, current_depth + 1))
            .collect()
    };
    DisplayNode { label, children }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct DisplayNode {
    label: String,
    children: Vec<DisplayNode>,
}

impl TreeItem for DisplayNode {
    type Child = DisplayNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
