//! The grammar-definition language's own grammar, built from the node
//! algebra it generates grammars for.
//!
//! A definition file is a prelude of control comments (`#:` directives) or
//! ordinary comments, followed by `name ::= alternation` lines. Alternation
//! binds loosest, then concatenation (`+`), then a repetition suffix
//! (`* N` or `* (min, max)` with `inf` for unbounded). Atoms are quoted
//! string literals with C-style escapes, character ranges `['a'-'z']`,
//! character sets `{"abc"}`, bare element references, and parenthesized
//! alternations. Horizontal whitespace is permitted around every atom;
//! newlines terminate definition lines.

use bbnf_core::{Expr, Grammar, GrammarBuilder, GrammarError, classes};

/// Build the meta-grammar. Its main element is `defs`, the whole file.
pub(crate) fn build() -> Result<Grammar, GrammarError> {
    let mut b = GrammarBuilder::new();

    // Handles first; definitions below reference forward and backward freely.
    let defs = b.element("defs");
    let defn = b.element("defn");
    let disj = b.element("disj");
    let conc = b.element("conc");
    let rept = b.element("rept");
    let range = b.element("range");
    let simple = b.element("simple");
    let intg = b.element("intg");
    let strg = b.element("strg");
    let chr = b.element("char");
    let chrs = b.element("chrs");
    let chrr = b.element("chrr");
    let elem = b.element("elem");
    let cmnt = b.element("cmnt");
    let ctrl = b.element("ctrl");
    let mdata = b.element("mdata");
    let dqchar = b.element("dqchar");
    let sqchar = b.element("sqchar");
    let eseq = b.element("eseq");
    let blank = b.element("blank");
    let space = b.element("space");

    let el = Expr::element;

    b.define("blank", Expr::char_set(" \t".chars()).repeated(0, None)?)?;
    b.define("space", Expr::char_set(" \t".chars()).repeated(1, None)?)?;

    // A file: control/comment prelude, then definition lines. Every line is
    // closed by a newline or a comment, so files end with a newline.
    let prelude = el(ctrl).or(el(cmnt)).repeated(0, None)?;
    let line = el(defn)
        .or(el(blank))
        .then(el(cmnt).or(Expr::lit("\n")?));
    b.define("defs", prelude.then(line.repeated(0, None)?))?;

    b.define("defn", Expr::concat(vec![el(elem), Expr::lit("::=")?, el(disj)])?)?;

    b.define(
        "disj",
        el(conc).then(Expr::lit("|")?.then(el(conc)).repeated(0, None)?),
    )?;
    b.define(
        "conc",
        el(rept).then(Expr::lit("+")?.then(el(rept)).repeated(0, None)?),
    )?;
    b.define(
        "rept",
        el(simple).then(
            Expr::lit("*")?
                .then(el(intg).or(el(range)))
                .repeated(0, Some(1))?,
        ),
    )?;

    let inf = Expr::concat(vec![el(blank), Expr::lit("inf")?, el(blank)])?;
    b.define(
        "range",
        Expr::concat(vec![
            el(blank),
            Expr::lit("(")?,
            el(intg),
            Expr::lit(",")?,
            el(intg).or(inf),
            Expr::lit(")")?,
            el(blank),
        ])?,
    )?;

    // The alternative index is what the atom rule dispatches on.
    let paren = Expr::concat(vec![
        el(blank),
        Expr::lit("(")?,
        el(disj),
        Expr::lit(")")?,
        el(blank),
    ])?;
    b.define(
        "simple",
        Expr::alt(vec![el(strg), el(chrs), el(chrr), el(elem), paren])?,
    )?;

    b.define(
        "cmnt",
        Expr::concat(vec![
            el(blank),
            Expr::lit("#")?,
            Expr::char_set("\n".chars()).invert()?.repeated(0, None)?,
            Expr::lit("\n")?,
        ])?,
    )?;
    b.define(
        "ctrl",
        Expr::concat(vec![el(blank), Expr::lit("#:")?, el(mdata), Expr::lit("\n")?])?,
    )?;
    b.define(
        "mdata",
        Expr::alt(vec![
            Expr::concat(vec![el(blank), Expr::lit("name")?, el(space), el(strg)])?,
            Expr::concat(vec![el(blank), Expr::lit("main")?, el(space), el(elem)])?,
        ])?,
    )?;

    let dquoted = Expr::concat(vec![
        Expr::lit("\"")?,
        el(dqchar).repeated(0, None)?,
        Expr::lit("\"")?,
    ])?;
    let squoted = Expr::concat(vec![
        Expr::lit("'")?,
        el(sqchar).repeated(0, None)?,
        Expr::lit("'")?,
    ])?;
    b.define("strg", Expr::concat(vec![el(blank), dquoted.or(squoted), el(blank)])?)?;

    let dquoted_one = Expr::concat(vec![Expr::lit("\"")?, el(dqchar), Expr::lit("\"")?])?;
    let squoted_one = Expr::concat(vec![Expr::lit("'")?, el(sqchar), Expr::lit("'")?])?;
    b.define(
        "char",
        Expr::concat(vec![el(blank), dquoted_one.or(squoted_one), el(blank)])?,
    )?;

    b.define(
        "intg",
        Expr::concat(vec![el(blank), classes::digit().repeated(1, None)?, el(blank)])?,
    )?;
    b.define(
        "chrr",
        Expr::concat(vec![
            el(blank),
            Expr::lit("[")?,
            el(chr),
            Expr::lit("-")?,
            el(chr),
            Expr::lit("]")?,
            el(blank),
        ])?,
    )?;
    b.define(
        "chrs",
        Expr::concat(vec![el(blank), Expr::lit("{")?, el(strg), Expr::lit("}")?, el(blank)])?,
    )?;

    let ident_first = classes::alpha().or(Expr::lit("_")?);
    let ident_rest =
        Expr::alt(vec![classes::alpha(), classes::digit(), Expr::lit("_")?])?.repeated(0, None)?;
    b.define(
        "elem",
        Expr::concat(vec![el(blank), ident_first.then(ident_rest), el(blank)])?,
    )?;

    b.define("dqchar", Expr::char_set("\\\"\n".chars()).invert()?.or(el(eseq)))?;
    b.define("sqchar", Expr::char_set("\\'\n".chars()).invert()?.or(el(eseq)))?;

    let esc_simple = Expr::char_set("\\\"'rnt".chars());
    let esc_hex = Expr::lit("x")?.then(classes::hex_digit().repeated(2, Some(2))?);
    let esc_uni = Expr::lit("u")?.then(classes::hex_digit().repeated(4, Some(4))?);
    b.define(
        "eseq",
        Expr::lit("\\")?.then(Expr::alt(vec![esc_simple, esc_hex, esc_uni])?),
    )?;

    Ok(b.finish(defs))
}
