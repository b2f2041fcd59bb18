//! Stack machine turning a block token stream into raw nodes.
//!
//! Recovery rules for unbalanced input:
//!
//!     - A closer naming a frame deeper in the stack closes that frame. Every frame
//!       above it is unwound and its bytes (opener included) become literal text of the
//!       matching frame.
//!     - A closer naming no open frame is literal text of the current frame.
//!     - End of input closes every open frame without a closer.
//!     - An opener that would exceed the depth limit is literal text.
//!
//! Each recovery leaves a [Diagnostic]. No input byte is dropped.

use super::node::RawBlockNode;
use crate::blocks::ast::{Attributes, Delimiters, Diagnostic, DiagnosticKind};
use crate::blocks::token::{Delimiter, Token};
use std::ops::Range;

/// Nesting limit used when no configuration is supplied.
pub const DEFAULT_MAX_DEPTH: usize = 256;

struct Frame {
    name: String,
    attributes: Option<Attributes>,
    opener: String,
    start: usize,
    inner_blocks: Vec<RawBlockNode>,
    inner_content: Vec<Option<String>>,
    inner_html: String,
}

impl Frame {
    fn open(delimiter: &Delimiter, opener: &str, start: usize) -> Self {
        Frame {
            name: delimiter.name.clone(),
            attributes: delimiter.attributes.clone(),
            opener: opener.to_string(),
            start,
            inner_blocks: Vec::new(),
            inner_content: Vec::new(),
            inner_html: String::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.inner_content.last_mut() {
            Some(Some(chunk)) => chunk.push_str(text),
            _ => self.inner_content.push(Some(text.to_string())),
        }
        self.inner_html.push_str(text);
    }

    fn push_block(&mut self, node: RawBlockNode) {
        self.inner_content.push(None);
        self.inner_blocks.push(node);
    }

    fn close(self, closer: Option<String>, end: usize) -> RawBlockNode {
        RawBlockNode {
            name: Some(self.name),
            attributes: self.attributes,
            inner_blocks: self.inner_blocks,
            inner_html: self.inner_html,
            inner_content: self.inner_content,
            delimiters: Delimiters::new(self.opener, closer),
            span: self.start..end,
        }
    }
}

/// Builds the raw node forest for one source text.
pub struct TreeBuilder<'a> {
    source: &'a str,
    max_depth: usize,
    stack: Vec<Frame>,
    roots: Vec<RawBlockNode>,
    freeform: Option<Range<usize>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_max_depth(source, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(source: &'a str, max_depth: usize) -> Self {
        TreeBuilder {
            source,
            max_depth: max_depth.max(1),
            stack: Vec::new(),
            roots: Vec::new(),
            freeform: None,
            diagnostics: Vec::new(),
        }
    }

    /// Consume the token stream and return the forest with recovery diagnostics.
    pub fn build(
        mut self,
        tokens: &[(Token, Range<usize>)],
    ) -> (Vec<RawBlockNode>, Vec<Diagnostic>) {
        for (token, span) in tokens {
            match token {
                Token::Text => self.text(span.clone()),
                Token::BlockOpen(delimiter) => self.open(delimiter, span.clone()),
                Token::BlockSelfClosing(delimiter) => self.self_closing(delimiter, span.clone()),
                Token::BlockClose(delimiter) => self.close(delimiter, span.clone()),
            }
        }
        self.finish()
    }

    fn text(&mut self, span: Range<usize>) {
        let source = self.source;
        match self.stack.last_mut() {
            Some(frame) => frame.push_text(&source[span]),
            None => {
                self.freeform = Some(match self.freeform.take() {
                    Some(run) => run.start..span.end,
                    None => span,
                });
            }
        }
    }

    fn open(&mut self, delimiter: &Delimiter, span: Range<usize>) {
        if self.stack.len() >= self.max_depth {
            self.depth_exceeded(&delimiter.name, span);
            return;
        }
        log::trace!("open {} at depth {}", delimiter.name, self.stack.len() + 1);
        let frame = Frame::open(delimiter, &self.source[span.clone()], span.start);
        self.stack.push(frame);
    }

    fn self_closing(&mut self, delimiter: &Delimiter, span: Range<usize>) {
        if self.stack.len() >= self.max_depth {
            self.depth_exceeded(&delimiter.name, span);
            return;
        }
        let node = Frame::open(delimiter, &self.source[span.clone()], span.start).close(None, span.end);
        self.attach(node);
    }

    fn close(&mut self, delimiter: &Delimiter, span: Range<usize>) {
        let Some(index) = self.stack.iter().rposition(|f| f.name == delimiter.name) else {
            log::debug!("orphan closer for {} at {}..{}", delimiter.name, span.start, span.end);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::OrphanCloser,
                span.clone(),
                format!("closer for {} has no open block", delimiter.name),
            ));
            self.text(span);
            return;
        };

        if index + 1 < self.stack.len() {
            let unwound_from = self.stack[index + 1].start;
            for frame in self.stack.drain(index + 1..) {
                log::debug!("unwinding unclosed {} into text", frame.name);
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnclosedBlock,
                    frame.start..span.start,
                    format!("{} closed by outer {}, kept as text", frame.name, delimiter.name),
                ));
            }
            let source = self.source;
            if let Some(frame) = self.stack.last_mut() {
                frame.push_text(&source[unwound_from..span.start]);
            }
        }

        if let Some(frame) = self.stack.pop() {
            log::trace!("close {}", frame.name);
            let closer = self.source[span.clone()].to_string();
            let node = frame.close(Some(closer), span.end);
            self.attach(node);
        }
    }

    fn depth_exceeded(&mut self, name: &str, span: Range<usize>) {
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::DepthLimitExceeded,
            span.clone(),
            format!("{} nested deeper than {} levels, kept as text", name, self.max_depth),
        ));
        self.text(span);
    }

    fn attach(&mut self, node: RawBlockNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_block(node),
            None => {
                self.flush_freeform();
                self.roots.push(node);
            }
        }
    }

    fn flush_freeform(&mut self) {
        if let Some(run) = self.freeform.take() {
            let text = &self.source[run.clone()];
            self.roots.push(RawBlockNode::freeform(text, run));
        }
    }

    fn finish(mut self) -> (Vec<RawBlockNode>, Vec<Diagnostic>) {
        let end = self.source.len();
        while let Some(frame) = self.stack.pop() {
            log::debug!("{} left open at end of input", frame.name);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnclosedBlock,
                frame.start..end,
                format!("{} is never closed", frame.name),
            ));
            let node = frame.close(None, end);
            self.attach(node);
        }
        self.flush_freeform();
        (self.roots, self.diagnostics)
    }
}
