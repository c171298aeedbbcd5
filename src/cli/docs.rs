//! Documentation content for the objfilter CLI

use super::CliError;
use crate::ImplementationProfile;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Context,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "context" | "contexts" => Some(Self::Context),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"OBJFILTER DOCUMENTATION

objfilter selects structured records (JSON objects) with small boolean
queries over their attributes.

DOCUMENTATION CATEGORIES

  syntax            Clauses, literals, paths, and boolean operators
  operators         Comparison, membership, and pattern operators
  context           Matching several clauses against one element of a list

QUICK REFERENCE

  size > 10                          Compare an attribute
  hash.md5 is "123abc"               Dotted paths reach nested attributes
  name not contains "tmp"            'not' negates word operators
  a is 1 and (b is 2 or c is 3)      Grouping
  @dlls ( name is "b.dll" )          Context operator

Run 'objfilter doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Context) => Ok(CONTEXT_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

/// One line per keyword of the profile's catalog.
pub fn operator_table(profile: &ImplementationProfile) -> String {
    profile
        .operators()
        .map(|(keyword, kind)| format!("  {:<12}{}\n", keyword, kind))
        .collect()
}

const SYNTAX_DOC: &str = r#"SYNTAX

CLAUSES
  <path> [not] <operator> <argument>

  Paths are attribute names joined by dots. Names are matched regardless
  of case unless --case-sensitive is given.

ARGUMENTS
  Integers        12, -3, 0x10
  Floats          1.5
  Strings         "double" or 'single' quoted
  Lists           [1, "a", 2.5]

  Bare words are not arguments: write name is "red", not name is red.

STRING ESCAPES
  \n \t \r \b \\ \' \"    Usual meanings
  \x41                    One byte given by two hex digits
  \\x41                   The literal text \x41

BOOLEAN OPERATORS
  and, AND        Both sides must match (binds tighter than or)
  or, OR          Either side must match
  ( ... )         Grouping

NEGATION
  name not contains "tmp"

  'not' goes between the path and a word operator. Symbolic operators
  cannot be negated; use != instead of not ==.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

  ==, is, equals    Equal. Numbers compare with numbers, strings with strings.
  !=                Not equal.
  <  <=  >  >=      Ordering of numbers, or of strings.
  contains          Substring of a string, or element of a list.
  inset             Member of a list argument. A list attribute matches
                    only if all of its elements are members. A string
                    argument matches substrings of a single value only.
  regexp            Regular expression search on strings and numbers.
                    Lists never match.

  A clause matches if any value found at its path satisfies the operator.
"#;

const CONTEXT_DOC: &str = r#"CONTEXT

  @<path> ( <expression> )

  Without a context, clauses over a list attribute may each be satisfied
  by a different element:

    dlls.name is "b.dll" and dlls.count == 2

  matches if one DLL is b.dll and another one has two entries. With a
  context, the expression must hold for one single element, and paths
  inside it are relative to that element:

    @dlls ( name is "b.dll" and count == 2 )

  Contexts nest:

    @dlls ( @functions ( name is "OpenFileA" ) )
"#;
