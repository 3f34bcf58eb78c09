// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Trees built from S-expressions.

//! A [Node](Node) is either a [Symbol](Symbol) leaf, a variable-arity
//! `List`, or a [Pair](Pair) chain, the canonical binary (cons cell)
//! form. Trees are never mutated after being read; use `clone` to get
//! an independent copy.

use kstring::KString;
use std::fmt::{Debug, Display, Formatter, Write};

/// An atom; its text is kept and rendered verbatim.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol(KString);

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_tuple("Symbol").field(&self.as_str()).finish()
    }
}

impl Symbol {
    pub fn from_ref(s: &str) -> Symbol {
        Symbol(KString::from_ref(s))
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Symbol {
        Symbol::from_ref(s)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Symbol(Symbol),
    List(Vec<Node>),
    Pair(Pair),
}

/// A cons cell. `next` is either the following cell of the chain, the
/// bare last element, or absent.
pub struct Pair {
    value: Box<Node>,
    next: Option<Box<Node>>,
}

/// What `Node::tail` returns: a borrowed view of the rest of a list or
/// chain.
#[derive(Debug, Clone, Copy)]
pub enum Tail<'t> {
    /// The elements after the first of a `Node::List`
    Rest(&'t [Node]),
    /// The `next` of a `Pair`
    Next(&'t Node),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Symbol(_))
    }

    /// Number of symbols in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Symbol(_) => 1,
            Node::List(v) => v.iter().map(Node::leaf_count).sum(),
            Node::Pair(p) => p.leaf_count(),
        }
    }

    /// The first element (car). A symbol is its own head; an empty
    /// list has none.
    pub fn head(&self) -> Option<&Node> {
        match self {
            Node::Symbol(_) => Some(self),
            Node::List(v) => v.first(),
            Node::Pair(p) => Some(p.value()),
        }
    }

    /// Everything after the head (cdr). Symbols and empty lists have
    /// no tail, and neither has the last cell of an unterminated
    /// chain.
    pub fn tail(&self) -> Option<Tail<'_>> {
        match self {
            Node::Symbol(_) => None,
            Node::List(v) => v.get(1..).map(Tail::Rest),
            Node::Pair(p) => p.next().map(Tail::Next),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Node::Symbol(s) => Display::fmt(&s, f),
            Node::List(v) => fmt_list(v, f),
            Node::Pair(p) => Display::fmt(&p, f),
        }
    }
}

fn fmt_list(v: &[Node], f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    f.write_char('(')?;
    for (i, item) in v.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        Display::fmt(&item, f)?;
    }
    f.write_char(')')
}

impl From<Symbol> for Node {
    fn from(s: Symbol) -> Node {
        Node::Symbol(s)
    }
}

impl From<Pair> for Node {
    fn from(p: Pair) -> Node {
        Node::Pair(p)
    }
}

/// Easily create a symbol node
pub fn symbol(s: &str) -> Node {
    Node::Symbol(Symbol::from_ref(s))
}

/// Easily create a flat list of symbols, e.g. `symbols(&["f", "x"])`
/// for `(f x)`
pub fn symbols(ss: &[&str]) -> Node {
    Node::List(ss.iter().map(|s| symbol(s)).collect())
}

impl Pair {
    pub fn new(value: Node, next: Option<Node>) -> Pair {
        Pair {
            value: Box::new(value),
            next: next.map(Box::new),
        }
    }

    /// Turn `node` into a chain cell; a node that already is a `Pair`
    /// is returned unchanged.
    pub fn promote(node: Node) -> Pair {
        match node {
            Node::Pair(p) => p,
            other => Pair::new(other, None),
        }
    }

    /// Build a right-nested chain holding `values` in order. If `last`
    /// is given, it becomes the bare `next` of the final cell,
    /// otherwise the final cell has no `next` (and a final value that
    /// is a `Pair` itself continues the chain, as with `promote`).
    /// Returns None if there is nothing to hold.
    pub fn chain(values: Vec<Node>, last: Option<Node>) -> Option<Pair> {
        let mut values = values;
        let mut next = last;
        if next.is_none() {
            next = Some(Node::Pair(Pair::promote(values.pop()?)));
        }
        let mut cell = match next {
            Some(Node::Pair(p)) if values.is_empty() => return Some(p),
            Some(n) => Pair::new(values.pop()?, Some(n)),
            None => return None,
        };
        while let Some(v) = values.pop() {
            cell = Pair::new(v, Some(Node::Pair(cell)));
        }
        Some(cell)
    }

    pub fn value(&self) -> &Node {
        &self.value
    }

    pub fn next(&self) -> Option<&Node> {
        self.next.as_deref()
    }

    fn next_pair(&self) -> Option<&Pair> {
        match self.next() {
            Some(Node::Pair(p)) => Some(p),
            _ => None,
        }
    }

    /// The final cell of the chain.
    pub fn last(&self) -> &Pair {
        let mut cell = self;
        while let Some(p) = cell.next_pair() {
            cell = p;
        }
        cell
    }

    /// The bare element stored in the `next` of the final cell, if
    /// any.
    pub fn terminal(&self) -> Option<&Node> {
        self.last().next()
    }

    /// The cells of the chain, in order.
    pub fn iter(&self) -> Cells<'_> {
        Cells { cell: Some(self) }
    }

    fn leaf_count(&self) -> usize {
        self.iter().map(|p| p.value().leaf_count()).sum::<usize>()
            + self.terminal().map_or(0, Node::leaf_count)
    }
}

pub struct Cells<'t> {
    cell: Option<&'t Pair>,
}

impl<'t> Iterator for Cells<'t> {
    type Item = &'t Pair;
    fn next(&mut self) -> Option<&'t Pair> {
        let cell = self.cell?;
        self.cell = cell.next_pair();
        Some(cell)
    }
}

// Chains can be arbitrarily long, so everything walking along `next`
// is written as a loop.

impl Display for Pair {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut depth = 0;
        for cell in self.iter() {
            if depth > 0 {
                f.write_char(' ')?;
            }
            f.write_char('(')?;
            depth += 1;
            Display::fmt(&cell.value, f)?;
        }
        if let Some(t) = self.terminal() {
            f.write_char(' ')?;
            Display::fmt(&t, f)?;
        }
        for _ in 0..depth {
            f.write_char(')')?;
        }
        Ok(())
    }
}

// The values of the cells, for Debug
struct CellValues<'t>(&'t Pair);

impl<'t> Debug for CellValues<'t> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.0.iter().map(Pair::value)).finish()
    }
}

impl Debug for Pair {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("Pair")
            .field("values", &CellValues(self))
            .field("terminal", &self.terminal())
            .finish()
    }
}

impl Clone for Pair {
    fn clone(&self) -> Pair {
        let rest: Vec<&Pair> = self.iter().skip(1).collect();
        let mut next = self.terminal().cloned();
        for cell in rest.into_iter().rev() {
            next = Some(Node::Pair(Pair::new(cell.value().clone(), next)));
        }
        Pair::new(self.value().clone(), next)
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Pair) -> bool {
        let mut a = self.iter();
        let mut b = other.iter();
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) => {
                    if x.value != y.value {
                        return false
                    }
                }
                (None, None) => return self.terminal() == other.terminal(),
                _ => return false,
            }
        }
    }
}

impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match *node {
                Node::Pair(mut p) => next = p.next.take(),
                _ => break,
            }
        }
    }
}

impl<'t> Tail<'t> {
    pub fn leaf_count(&self) -> usize {
        match self {
            Tail::Rest(v) => v.iter().map(Node::leaf_count).sum(),
            Tail::Next(n) => n.leaf_count(),
        }
    }

    /// Get an owned node for the tail.
    pub fn to_node(&self) -> Node {
        match self {
            Tail::Rest(v) => Node::List(v.to_vec()),
            Tail::Next(n) => (*n).clone(),
        }
    }
}

impl<'t> Display for Tail<'t> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Tail::Rest(v) => fmt_list(v, f),
            Tail::Next(n) => Display::fmt(&n, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ss: &[&str], last: Option<&str>) -> Pair {
        Pair::chain(ss.iter().map(|s| symbol(s)).collect(), last.map(symbol))
            .unwrap()
    }

    #[test]
    fn list_rendering() {
        let l = Node::List(vec![symbol("lambda"), symbol("x"),
                                symbols(&["f", "x"])]);
        assert_eq!(l.to_string(), "(lambda x (f x))");
        assert_eq!(Node::List(vec![]).to_string(), "()");
        assert_eq!(symbol("a-b?").to_string(), "a-b?");
    }

    #[test]
    fn chain_rendering() {
        assert_eq!(chain(&["x"], None).to_string(), "(x)");
        assert_eq!(chain(&["x"], Some("1")).to_string(), "(x 1)");
        assert_eq!(chain(&["lambda", "x", "f"], Some("x")).to_string(),
                   "(lambda (x (f x)))");
        assert_eq!(chain(&["fullstop", "Same"], None).to_string(),
                   "(fullstop (Same))");
    }

    #[test]
    fn chain_of_nothing() {
        assert!(Pair::chain(vec![], None).is_none());
        assert_eq!(Pair::chain(vec![], Some(symbol("a"))), None);
    }

    #[test]
    fn leaf_counts() {
        assert_eq!(symbol("a").leaf_count(), 1);
        let l = Node::List(vec![symbol("a"), symbols(&["b", "c"]),
                                Node::List(vec![])]);
        assert_eq!(l.leaf_count(), 3);
        let p = Node::Pair(chain(&["a", "b"], Some("c")));
        assert_eq!(p.leaf_count(), 3);
        let p = Node::Pair(chain(&["a", "b"], None));
        assert_eq!(p.leaf_count(), 2);
    }

    #[test]
    fn is_leaf() {
        assert!(symbol("a").is_leaf());
        assert!(!symbols(&["a"]).is_leaf());
        assert!(!Node::Pair(chain(&["a"], None)).is_leaf());
    }

    #[test]
    fn head_and_tail_of_symbol() {
        let s = symbol("a");
        assert_eq!(s.head(), Some(&s));
        assert!(s.tail().is_none());
    }

    #[test]
    fn head_and_tail_of_list() {
        let l = symbols(&["a", "b", "c"]);
        assert_eq!(l.head(), Some(&symbol("a")));
        let t = l.tail().unwrap();
        assert_eq!(t.to_string(), "(b c)");
        assert_eq!(t.leaf_count(), 2);
        assert_eq!(t.to_node(), symbols(&["b", "c"]));

        let empty = Node::List(vec![]);
        assert!(empty.head().is_none());
        assert!(empty.tail().is_none());
    }

    #[test]
    fn head_and_tail_of_pair() {
        let p = Node::Pair(chain(&["a", "b"], Some("c")));
        assert_eq!(p.head(), Some(&symbol("a")));
        assert_eq!(p.tail().unwrap().to_string(), "(b c)");
        let single = Node::Pair(chain(&["a"], None));
        assert!(single.tail().is_none());
    }

    #[test]
    fn promote_is_idempotent() {
        let p = Pair::promote(symbol("a"));
        assert_eq!(p.to_string(), "(a)");
        let p2 = Pair::promote(Node::Pair(p.clone()));
        assert_eq!(p2, p);
    }

    #[test]
    fn last_and_terminal() {
        let p = chain(&["a", "b", "c"], Some("d"));
        assert_eq!(p.last().value(), &symbol("c"));
        assert_eq!(p.terminal(), Some(&symbol("d")));
        assert_eq!(p.iter().count(), 3);
        let p = chain(&["a", "b"], None);
        assert_eq!(p.last().value(), &symbol("b"));
        assert!(p.terminal().is_none());
    }

    #[test]
    fn equality_distinguishes_termination() {
        assert_ne!(chain(&["a", "b"], None), chain(&["a"], Some("b")));
        assert_eq!(chain(&["a"], Some("b")), chain(&["a"], Some("b")));
        assert_ne!(chain(&["a"], Some("b")), chain(&["a", "x"], Some("b")));
    }

    #[test]
    fn debug_shows_cells_and_terminal() {
        let p = chain(&["a"], Some("b"));
        assert_eq!(format!("{:?}", p),
                   "Pair { values: [Symbol(Symbol(\"a\"))], \
                    terminal: Some(Symbol(Symbol(\"b\"))) }");
    }

    #[test]
    fn clones_are_equal_and_independent() {
        let inner = Node::Pair(chain(&["f"], Some("x")));
        let tree = Node::List(vec![symbol("g"), inner,
                                   Node::Pair(chain(&["a", "b"], None))]);
        let copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.to_string(), tree.to_string());
        drop(tree);
        assert_eq!(copy.to_string(), "(g (f x) (a (b)))");
    }

    #[test]
    fn long_chains_do_not_recurse() {
        let n = 200_000;
        let values: Vec<Node> = (0..n).map(|i| symbol(&i.to_string())).collect();
        let p = Pair::chain(values, None).unwrap();
        assert_eq!(Node::Pair(p.clone()).leaf_count(), n);
        let q = p.clone();
        assert!(p == q);
        assert!(p.to_string().ends_with("(199999))"));
        let dbg = format!("{:?}", Node::Pair(q.clone()));
        assert!(dbg.starts_with("Pair(Pair { values: [Symbol(Symbol(\"0\")), "));
        assert!(dbg.ends_with("Symbol(Symbol(\"199999\"))], terminal: None })"));
        drop(p);
        drop(q);
    }
}
