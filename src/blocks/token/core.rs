//! Scanner tokens produced by the logos lexer.
//!
//! The scanner only finds where a block delimiter could start: every `<` is an `Angle`
//! token and everything between them is a `Text` run, so every byte of the input belongs
//! to exactly one scan token. Whether an `Angle` opens a delimiter, and where that
//! delimiter ends, is decided by the grammar in
//! [delimiter](crate::blocks::lexing::delimiter). The lexer then skips the scanner past it.
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanToken {
    #[token("<")]
    Angle,

    #[regex(r"[^<]+")]
    Text,
}
