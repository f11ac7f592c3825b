use gw_core::{NodeId, ParseWarning, ParserConfig, StringTree, WarningCode};
use tracing::{debug, trace};

use crate::encoding::LogicalLine;
use crate::tokenizer::{Token, has_level_prefix, tokenize_line};

/// Builds the generic line tree from decoded lines.
///
/// Keeps a stack of open nodes as `(declared level, node)`. A line at level `L`
/// closes every open node at `L` or deeper and becomes a child of whatever is left on
/// top. `CONT` and `CONC` never become nodes; they extend the value of the node they
/// would have been a child of.
pub(crate) struct TreeBuilder<'c> {
    config: &'c ParserConfig,
    tree: StringTree,
    open: Vec<(u32, NodeId)>,
    last_node: Option<NodeId>,
    warnings: Vec<ParseWarning>,
}

impl<'c> TreeBuilder<'c> {
    pub(crate) fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            tree: StringTree::new(),
            open: Vec::new(),
            last_node: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: &LogicalLine) {
        match tokenize_line(line, self.config) {
            Ok(token) if token.tag == "CONT" || token.tag == "CONC" => self.continuation(&token),
            Ok(token) => self.open_node(token),
            Err(warning) => self.malformed(line, warning),
        }
    }

    pub(crate) fn finish(self) -> (StringTree, Vec<ParseWarning>) {
        debug!(
            nodes = self.tree.len(),
            roots = self.tree.roots().len(),
            warnings = self.warnings.len(),
            "built line tree"
        );
        (self.tree, self.warnings)
    }

    /// Pops every open node at `level` or deeper and returns the remaining top.
    fn close_to(&mut self, level: u32) -> Option<(u32, NodeId)> {
        while self.open.last().is_some_and(|(open_level, _)| *open_level >= level) {
            self.open.pop();
        }
        self.open.last().copied()
    }

    fn open_node(&mut self, token: Token) {
        let parent = match self.close_to(token.level) {
            None if token.level > 0 => {
                self.warnings.push(ParseWarning::at_line(
                    WarningCode::LevelSkip,
                    token.line,
                    format!(
                        "level {} {} has no enclosing record; kept as a new root",
                        token.level, token.tag
                    ),
                ));
                None
            }
            None => None,
            Some((parent_level, parent)) => {
                if parent_level + 1 != token.level {
                    self.warnings.push(ParseWarning::at_line(
                        WarningCode::LevelSkip,
                        token.line,
                        format!(
                            "level {} {} skips from level {parent_level}; attached under {}",
                            token.level,
                            token.tag,
                            self.tree.tag_path(parent)
                        ),
                    ));
                }
                Some(parent)
            }
        };

        trace!(line = token.line, level = token.level, tag = %token.tag, "node");
        let id = self
            .tree
            .push(parent, token.xref, token.tag, token.value, token.line);
        self.open.push((token.level, id));
        self.last_node = Some(id);
    }

    fn continuation(&mut self, token: &Token) {
        let Some((parent_level, target)) = self.close_to(token.level) else {
            self.warnings.push(ParseWarning::at_line(
                WarningCode::OrphanContinuation,
                token.line,
                format!("{} has nothing to continue; dropped", token.tag),
            ));
            return;
        };
        if parent_level + 1 != token.level {
            self.warnings.push(ParseWarning::at_line(
                WarningCode::LevelSkip,
                token.line,
                format!(
                    "{} at level {} continues level {parent_level}",
                    token.tag, token.level
                ),
            ));
        }

        let text = token.value.as_deref().unwrap_or_default();
        if token.tag == "CONT" {
            self.tree.append_value(target, "\n", text);
        } else if !text.is_empty() {
            self.tree.append_value(target, "", text);
        }
    }

    fn malformed(&mut self, line: &LogicalLine, warning: ParseWarning) {
        if self.config.lenient_line_breaks
            && !has_level_prefix(&line.text)
            && let Some(target) = self.last_node
        {
            self.tree.append_value(target, "\n", &line.text);
            self.warnings.push(ParseWarning::at_line(
                WarningCode::NonStandardLineBreak,
                line.number,
                "line without a level folded into the previous value as a continuation",
            ));
            return;
        }
        self.warnings.push(warning);
    }
}

/// Convenience wrapper running every line through a [`TreeBuilder`].
pub fn build_tree(lines: &[LogicalLine], config: &ParserConfig) -> (StringTree, Vec<ParseWarning>) {
    let mut builder = TreeBuilder::new(config);
    for line in lines {
        builder.push_line(line);
    }
    builder.finish()
}
