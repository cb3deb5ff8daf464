//! Word splitting for block parameters and HTML attributes
//!
//! `#+BEGIN_SRC go :results "two words"` and `#+ATTR_HTML: :alt "a cat" :width 50`
//! both carry a whitespace separated list where double-quoted runs stay together.
//! A logos lexer produces quoted/bare/whitespace tokens and a chumsky parser joins
//! adjacent non-whitespace tokens into words.
//!
//! Grammar: `<words> = <ws>* (<word> <ws>*)*`
//! Where: `<word> = (<quoted> | <bare> | <stray-quote>)+`

use chumsky::{prelude::*, Stream};
use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamToken {
    #[regex(r#""[^"]*""#, |lex| lex.slice().to_owned())]
    Quoted(String),

    #[regex(r#"[^\s"]+"#, |lex| lex.slice().to_owned())]
    Word(String),

    #[token("\"")]
    StrayQuote,

    #[regex(r"\s+")]
    Whitespace,
}

type ParserError = Simple<ParamToken>;

fn lex(input: &str) -> Vec<(ParamToken, Range<usize>)> {
    ParamToken::lexer(input)
        .spanned()
        .map(|(token, span)| {
            let token = token.unwrap_or_else(|_| ParamToken::Word(input[span.clone()].to_owned()));
            (token, span)
        })
        .collect()
}

fn split(input: &str, strip_quotes: bool) -> Vec<String> {
    let tokens = lex(input);
    if tokens.is_empty() {
        return Vec::new();
    }

    let whitespace0 = filter::<ParamToken, _, ParserError>(|t: &ParamToken| {
        matches!(t, ParamToken::Whitespace)
    })
    .repeated()
    .ignored();

    let piece = filter::<ParamToken, _, ParserError>(|t: &ParamToken| {
        !matches!(t, ParamToken::Whitespace)
    })
    .map(move |t| match t {
        ParamToken::Quoted(s) if strip_quotes => s[1..s.len() - 1].to_string(),
        ParamToken::Quoted(s) | ParamToken::Word(s) => s,
        ParamToken::StrayQuote => "\"".to_string(),
        ParamToken::Whitespace => String::new(),
    });

    let word = piece
        .repeated()
        .at_least(1)
        .map(|pieces: Vec<String>| pieces.concat());

    let parser = whitespace0
        .ignore_then(word.then_ignore(whitespace0).repeated())
        .then_ignore(end());

    let len = input.len();
    let stream = Stream::from_iter(len..len, tokens.into_iter());
    parser.parse(stream).unwrap_or_default()
}

/// Split block parameters, keeping quotes so they re-serialize unchanged.
pub fn split_parameters(input: &str) -> Vec<String> {
    split(input, false)
}

/// Split an `#+ATTR_HTML:` value into words with surrounding quotes removed.
pub fn split_attributes(input: &str) -> Vec<String> {
    split(input, true)
}
