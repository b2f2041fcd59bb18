//! Block parser entry point
//!
//!     [BlockParser] runs the full pipeline: raw tree construction, then resolution of
//!     every node against the registry.
//!
//! Resolution
//!
//!     For each node, children first:
//!
//!         freeform        valid, no attributes
//!         unregistered    invalid, no attributes, content kept
//!         registered      attributes extracted, then validated against `save`;
//!                         invalid content goes to the [migration] resolver
//!
//!     Resolution walks the tree with an explicit work stack. Output order follows
//!     source order.
//!
//!     A failure of the HTML facility is the one reportable error. The block keeps its
//!     content, is marked invalid and carries the error, and the document gets an
//!     error diagnostic.
//!
//! [migration]: crate::blocks::migration

use crate::blocks::ast::{
    Attributes, BlockUpgrade, Diagnostic, DiagnosticKind, Document, ResolvedBlock,
};
use crate::blocks::building::AttributeExtractor;
use crate::blocks::html::{FragmentError, Html5everFacility, HtmlFacility};
use crate::blocks::migration::MigrationResolver;
use crate::blocks::parsing::{parse_raw_with_diagnostics, RawBlockNode};
use crate::blocks::registry::{AttributeSchemas, BlockRegistry, BlockType};
use crate::blocks::validation::Validator;
use wp_block_parser_config::BlocksConfig;

/// Configured parser: registry, HTML facility and configuration.
pub struct BlockParser<'r> {
    registry: &'r dyn BlockRegistry,
    facility: Box<dyn HtmlFacility + 'r>,
    config: BlocksConfig,
}

impl<'r> BlockParser<'r> {
    /// A parser with the html5ever facility and default configuration.
    pub fn new(registry: &'r dyn BlockRegistry) -> Self {
        BlockParser {
            registry,
            facility: Box::new(Html5everFacility::new()),
            config: BlocksConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BlocksConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_facility(mut self, facility: impl HtmlFacility + 'r) -> Self {
        self.facility = Box::new(facility);
        self
    }

    pub fn config(&self) -> &BlocksConfig {
        &self.config
    }

    /// Parse and resolve, dropping diagnostics.
    pub fn parse(&self, source: &str) -> Vec<ResolvedBlock> {
        self.parse_document(source).blocks
    }

    /// Parse and resolve, keeping diagnostics.
    pub fn parse_document(&self, source: &str) -> Document {
        let (nodes, mut diagnostics) =
            parse_raw_with_diagnostics(source, self.config.parser.max_depth);
        let blocks = self.resolve_all(nodes, &mut diagnostics);
        diagnostics.sort_by_key(|d| d.span.start);
        Document::new(blocks, diagnostics)
    }

    /// Resolve a raw forest, children before parents.
    pub fn resolve_all(
        &self,
        nodes: Vec<RawBlockNode>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ResolvedBlock> {
        enum Work {
            Enter(RawBlockNode),
            Exit(RawBlockNode, usize),
        }

        let mut work: Vec<Work> = nodes.into_iter().rev().map(Work::Enter).collect();
        let mut done: Vec<ResolvedBlock> = Vec::new();

        while let Some(item) = work.pop() {
            match item {
                Work::Enter(mut node) => {
                    let children = std::mem::take(&mut node.inner_blocks);
                    work.push(Work::Exit(node, children.len()));
                    work.extend(children.into_iter().rev().map(Work::Enter));
                }
                Work::Exit(node, child_count) => {
                    let children = done.split_off(done.len() - child_count);
                    let block = self.resolve(node, children, diagnostics);
                    done.push(block);
                }
            }
        }

        done
    }

    fn resolve(
        &self,
        node: RawBlockNode,
        inner_blocks: Vec<ResolvedBlock>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ResolvedBlock {
        let mut block = ResolvedBlock {
            name: node.name.clone(),
            attributes: Attributes::new(),
            inner_blocks,
            is_valid: false,
            original_content: node.inner_html.clone(),
            migrated_from: None,
            inner_content: node.inner_content.clone(),
            delimiters: node.delimiters.clone(),
            upgrade: None,
            error: None,
        };

        let Some(name) = node.name.as_deref() else {
            block.is_valid = true;
            return block;
        };

        let Some(block_type) = self.registry.lookup(name) else {
            log::debug!("{} is not registered", name);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnregisteredBlock,
                node.span.clone(),
                format!("{} is not registered", name),
            ));
            return block;
        };

        if let Err(e) = self.resolve_registered(&mut block, block_type, &node, diagnostics) {
            log::warn!("{}: HTML facility failed: {}", name, e);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::HtmlFacilityFailure,
                node.span.clone(),
                format!("{}: {}", name, e),
            ));
            block.is_valid = false;
            block.migrated_from = None;
            block.upgrade = None;
            block.error = Some(e);
        }
        block
    }

    fn resolve_registered(
        &self,
        block: &mut ResolvedBlock,
        block_type: &BlockType,
        node: &RawBlockNode,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), FragmentError> {
        let comment = node.attributes.as_ref();
        let extractor = AttributeExtractor::new(self.facility.as_ref());
        block.attributes = extractor.extract(&block_type.attributes, comment, &node.inner_html)?;

        let validator = Validator::new(self.facility.as_ref(), self.config.validation.clone());
        if validator.validate(|a| block_type.save(a), &block.attributes, &node.inner_html)? {
            block.is_valid = true;
            return Ok(());
        }

        if block_type.deprecated.is_empty() {
            self.report_invalid(node, diagnostics);
            return Ok(());
        }

        let resolver = MigrationResolver::new(self.facility.as_ref(), self.config.validation.clone());
        let outcome = resolver.resolve(block_type, comment, &node.inner_html)?;
        match (outcome.migrated_from(), outcome.attributes) {
            (Some(index), Some(migrated)) => {
                block.migrated_from = Some(index);
                block.is_valid = outcome.is_valid;
                if outcome.is_valid && block.inner_blocks.is_empty() {
                    block.upgrade = outcome.saved.map(|content| BlockUpgrade {
                        attributes: comment_attributes(&block_type.attributes, &migrated),
                        content,
                    });
                }
                block.attributes = migrated;
                if !outcome.is_valid {
                    self.report_invalid(node, diagnostics);
                }
            }
            _ => self.report_invalid(node, diagnostics),
        }
        Ok(())
    }

    fn report_invalid(&self, node: &RawBlockNode, diagnostics: &mut Vec<Diagnostic>) {
        let name = node.name.as_deref().unwrap_or_default();
        log::debug!("{}: stored markup does not validate", name);
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::InvalidContent,
            node.span.clone(),
            format!("{} content does not match its definition", name),
        ));
    }
}

/// Attributes that belong in the delimiter comment: comment-sourced and not equal to
/// their default.
pub fn comment_attributes(schemas: &AttributeSchemas, attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(key, value)| match schemas.get(key) {
            Some(schema) => schema.is_comment_sourced() && schema.default.as_ref() != Some(*value),
            None => false,
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Parse and resolve `source` against `registry` with default settings.
pub fn parse(source: &str, registry: &dyn BlockRegistry) -> Vec<ResolvedBlock> {
    BlockParser::new(registry).parse(source)
}
