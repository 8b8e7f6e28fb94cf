//! Target-language spellings: operators, unit boilerplate and naming.

use crate::lexer::{Keyword, TokenKind};

/// Standard headers every interface unit pulls in.
const PRELUDE_INCLUDES: [&str; 5] = ["stdint.h", "stdbool.h", "stdlib.h", "string.h", "math.h"];

/// `<Module>_<name>`, the spelling of every module-level symbol.
#[must_use]
pub fn mangle(module: &str, name: &str) -> String {
    format!("{module}_{name}")
}

/// A full declarator: the type prefix and suffix wrap the mangled name.
#[must_use]
pub fn declarator(prefix: &str, module: &str, name: &str, suffix: &str) -> String {
    format!("{prefix} {}{suffix}", mangle(module, name))
}

/// Binary operator spelling, padded with spaces.
#[must_use]
pub fn operator(kind: &TokenKind) -> Option<&'static str> {
    let op = match kind {
        TokenKind::Equal => " == ",
        TokenKind::NotEqual => " != ",
        TokenKind::Less => " < ",
        TokenKind::LessEqual => " <= ",
        TokenKind::Greater => " > ",
        TokenKind::GreaterEqual => " >= ",
        TokenKind::Plus => " + ",
        TokenKind::Minus => " - ",
        TokenKind::Keyword(Keyword::Or) => " || ",
        TokenKind::Asterisk => " * ",
        TokenKind::Slash | TokenKind::Keyword(Keyword::Div) => " / ",
        TokenKind::Keyword(Keyword::Mod) => " % ",
        TokenKind::Ampersand => " && ",
        _ => return None,
    };
    Some(op)
}

#[must_use]
pub fn is_relation(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
    )
}

#[must_use]
pub fn is_add_operator(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Plus | TokenKind::Minus | TokenKind::Keyword(Keyword::Or))
}

#[must_use]
pub fn is_mul_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Keyword(Keyword::Div)
            | TokenKind::Keyword(Keyword::Mod)
            | TokenKind::Ampersand
    )
}

/// Spelling of a built-in type name.
#[must_use]
pub fn builtin_type_name(keyword: Keyword) -> Option<&'static str> {
    let name = match keyword {
        Keyword::Integer => "int",
        Keyword::LongInt => "long",
        Keyword::Real => "float",
        Keyword::LongReal => "double",
        Keyword::Boolean => "bool",
        Keyword::Char => "char",
        _ => return None,
    };
    Some(name)
}

#[must_use]
pub fn include(header: &str) -> String {
    format!("#include \"{header}\"\n")
}

/// Include guard, standard headers and the arithmetic-shift helper macro.
#[must_use]
pub fn interface_prelude(module: &str) -> String {
    let mut text = format!("#ifndef {module}_H\n#define {module}_H\n\n");
    for header in PRELUDE_INCLUDES {
        text.push_str(&format!("#include <{header}>\n"));
    }
    text.push_str(&format!(
        "#define {}(x, n) ((n) >= 0 ? ((x) << (n)) : ((x) >> -(n)))\n\n",
        ash_macro(module)
    ));
    text
}

#[must_use]
pub fn ash_macro(module: &str) -> String {
    format!("{module}_ASH")
}

#[must_use]
pub fn init_function(module: &str) -> String {
    format!("mod_{module}_init")
}

/// Opening of the once-only initializer, up to where the module body goes.
#[must_use]
pub fn init_prologue(module: &str) -> String {
    let flag = format!("is_{module}_init");
    format!(
        "\nstatic bool {flag} = false;\nvoid {}() {{\nif ({flag}) {{\nreturn;\n}}\n{flag} = true;\n",
        init_function(module)
    )
}

/// Interface tail: the initializer declaration and the guard's `#endif`.
#[must_use]
pub fn interface_epilogue(module: &str) -> String {
    format!("\nextern void {}();\n\n#endif\n", init_function(module))
}

#[must_use]
pub fn define(module: &str, name: &str, value: &str) -> String {
    format!("#define\t{}\t{value}\n", mangle(module, name))
}
