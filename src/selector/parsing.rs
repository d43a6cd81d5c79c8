use nom::branch::alt;
use nom::bytes::complete::{is_not, take_while};
use nom::character::complete::{alpha1, char, one_of, satisfy};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::multi::many1;
use nom::sequence::{pair, preceded, separated_pair};
use nom::IResult;

use super::Selector;

enum Token<'a> {
    Ident(&'a str),
    Delim(char),
}

/// A maximal run of non-delimiter characters, or a single `#`/`.` delimiter
fn token(input: &str) -> IResult<&str, Token> {
    alt((map(is_not("#."), Token::Ident), map(one_of("#."), Token::Delim)))(input)
}

/// Tokenize a selector string into a [`Selector`] descriptor.
///
/// This scan never fails: the first token before any delimiter becomes the
/// tag, the first token after a `#` becomes the id (later `#` runs are
/// anomalies and their tokens fall into the class list), and every token
/// after a `.` is appended to the class list in encountered order. Empty
/// runs between delimiters are skipped. Whether the string is actually
/// part of the supported grammar is a separate question ([`is_supported`]).
pub fn parse(input: &str) -> Selector {
    let mut selector = Selector::default();
    let mut previous = None;
    let mut rest = input;
    while let Ok((remaining, tok)) = token(rest) {
        rest = remaining;
        match tok {
            Token::Delim(delimiter) => previous = Some(delimiter),
            Token::Ident(name) => match previous {
                None => selector.tag_name = Some(name.to_string()),
                Some('#') => {
                    if selector.id.is_none() {
                        selector.id = Some(name.to_string());
                    }
                }
                Some(_) => selector.classes.push(name.to_string()),
            },
        }
    }
    selector
}

#[cfg(test)]
#[test]
fn test_parse_selector() {
    let i = "div";
    assert_eq!(
        parse(i),
        Selector {
            tag_name: Some("div".to_string()),
            ..Default::default()
        }
    );
    let i = "h1#title";
    assert_eq!(
        parse(i),
        Selector {
            tag_name: Some("h1".to_string()),
            id: Some("title".to_string()),
            ..Default::default()
        }
    );
    let i = "h4.subtitle.dek";
    assert_eq!(
        parse(i),
        Selector {
            tag_name: Some("h4".to_string()),
            classes: vec!["subtitle".to_string(), "dek".to_string()],
            ..Default::default()
        }
    );
    // Starts with a delimiter, so there is no tag to honor
    let i = "#44";
    assert_eq!(
        parse(i),
        Selector {
            id: Some("44".to_string()),
            ..Default::default()
        }
    );
    // Only the first id token is honored
    let i = "div#a#b";
    assert_eq!(parse(i).id, Some("a".to_string()));
    // Empty runs between delimiters are skipped
    let i = "div..wide";
    assert_eq!(parse(i).classes, vec!["wide".to_string()]);
}

/// `[a-zA-Z]+` with an optional single trailing digit
fn tag_token(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, opt(satisfy(|c| c.is_ascii_digit()))))(input)
}

/// An alphabetic-led id token. `.` is not an id character, so a selector
/// cannot combine an id with classes.
fn id_token(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || "-:_".contains(c)),
    ))(input)
}

/// A `.`-led class token; embedded `.`-joined runs stay in one token here
/// and are re-split by the tokenizer
fn class_token(input: &str) -> IResult<&str, &str> {
    preceded(
        char('.'),
        recognize(pair(
            satisfy(|c| c == '_' || c.is_ascii_alphabetic()),
            take_while(|c: char| c.is_ascii_alphanumeric() || "_.-".contains(c)),
        )),
    )(input)
}

fn simple_tag(input: &str) -> IResult<&str, &str> {
    all_consuming(tag_token)(input)
}

fn tag_with_id(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(tag_token, char('#'), id_token))(input)
}

fn tag_with_classes(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    all_consuming(pair(tag_token, many1(class_token)))(input)
}

/// Whether the whole string falls inside the supported selector grammar:
/// a tag alone, a tag with one id, or a tag with one or more classes.
pub fn is_supported(selector: &str) -> bool {
    simple_tag(selector).is_ok()
        || tag_with_id(selector).is_ok()
        || tag_with_classes(selector).is_ok()
}

#[cfg(test)]
#[test]
fn test_supported_grammar() {
    assert!(is_supported("div"));
    assert!(is_supported("h1"));
    assert!(is_supported("div#myId"));
    assert!(is_supported("div#my-id:2"));
    assert!(is_supported("div.myClass.another"));
    assert!(is_supported("h4.subtitle.dek"));
    assert!(is_supported("span._private-class"));

    assert!(!is_supported(""));
    assert!(!is_supported("#44"));
    assert!(!is_supported(".wide"));
    assert!(!is_supported("div span"));
    assert!(!is_supported("div > span"));
    assert!(!is_supported("div[attr=value]"));
    assert!(!is_supported("h1#title#other"));
    // One id or classes, never both
    assert!(!is_supported("div#id.cls"));
    // Class tokens may not lead with a digit
    assert!(!is_supported("div.9lives"));
}
