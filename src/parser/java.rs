//! Declaration-level Java scanner.
//!
//! Walks the token stream of one compilation unit and reports packages,
//! imports, type declarations, fields, methods and javadoc comments as
//! [`ModelEvents`]. Statements and expressions are not parsed: bodies are
//! skipped by bracket depth and handed over as raw text. Inside bodies and
//! initializers only `new T(...)` is looked at, for classifier dependencies
//! and anonymous classes.

use thiserror::Error;

use crate::base::{LineCol, LineIndex, TextSize};
use crate::import::{
    AttributeDecl, ClassDecl, ModelEvents, ModellerError, Modifiers, OperationDecl, ParamDecl,
};
use crate::resolve::names::is_primitive;

use super::lexer::{Token, TokenKind, tokenize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub offset: TextSize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: TextSize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    pub fn line_col(&self, index: &LineIndex) -> LineCol {
        index.line_col(self.offset)
    }
}

/// Why a source unit could not be modelled.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Modeller(#[from] ModellerError),
}

/// Scan `text` and report it to `events` as the unit `unit_name`.
pub fn parse_source(
    text: &str,
    unit_name: &str,
    events: &mut impl ModelEvents,
) -> Result<(), SourceError> {
    let tokens = tokenize(text)
        .into_iter()
        .filter(|t| !t.is_trivia() || t.is_doc_comment())
        .collect();
    let mut scanner = Scanner {
        text,
        tokens,
        pos: 0,
        doc: None,
    };
    events.add_component(unit_name)?;
    scanner.compilation_unit(events)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

struct Scanner<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Last javadoc comment seen and not yet attached.
    doc: Option<&'a str>,
}

impl<'a> Scanner<'a> {
    // ── Token access ────────────────────────────────────────────────

    fn skip_docs(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.is_doc_comment() {
                break;
            }
            self.doc = Some(token.text);
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<Token<'a>> {
        self.skip_docs();
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Kind of the `n`-th non-doc token after the current one.
    fn nth_kind(&mut self, n: usize) -> Option<TokenKind> {
        self.skip_docs();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.is_doc_comment())
            .nth(n)
            .map(|t| t.kind)
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_ident(&mut self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == text)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'a>, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::new(
                format!("expected {what}, found `{}`", token.text),
                token.offset,
            )),
            None => Err(self.eof(what)),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<&'a str, ParseError> {
        self.expect(TokenKind::Ident, what).map(|t| t.text)
    }

    fn eof(&self, what: &str) -> ParseError {
        ParseError::new(
            format!("expected {what}, found end of file"),
            TextSize::of(self.text),
        )
    }

    /// Skip a bracketed group starting at the current opening token.
    fn skip_group(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            let token = self.bump().ok_or_else(|| self.eof("closing bracket"))?;
            match token.kind {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip `<...>`, counting nested angle brackets.
    fn skip_angles(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            let token = self.bump().ok_or_else(|| self.eof("`>`"))?;
            match token.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    // ── Compilation unit ────────────────────────────────────────────

    fn compilation_unit(&mut self, events: &mut impl ModelEvents) -> Result<(), SourceError> {
        self.skip_annotations()?;
        if self.eat(TokenKind::PackageKw) {
            let name = self.qualified_name()?;
            self.expect(TokenKind::Semicolon, "`;`")?;
            events.add_package(&name)?;
        }

        while self.eat(TokenKind::ImportKw) {
            let is_static = self.eat(TokenKind::StaticKw);
            let mut name = self.qualified_name()?;
            let on_demand = self.eat(TokenKind::Dot);
            if on_demand {
                self.expect(TokenKind::Operator, "`*`")?;
            }
            self.expect(TokenKind::Semicolon, "`;`")?;
            if is_static && !on_demand {
                // import static a.B.member; imports the class
                match name.rsplit_once('.') {
                    Some((class, _)) => name = class.to_string(),
                    None => continue,
                }
            }
            events.add_import(&name, on_demand)?;
        }

        loop {
            self.doc = None;
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            if self.peek().is_none() {
                return Ok(());
            }
            self.member(events, None)?;
        }
    }

    fn qualified_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident("name")?.to_string();
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            name.push('.');
            name.push_str(self.expect_ident("name")?);
        }
        Ok(name)
    }

    // ── Declarations ────────────────────────────────────────────────

    /// `@Name`, `@a.Name(...)`; stops before `@interface`.
    fn skip_annotations(&mut self) -> Result<(), ParseError> {
        while self.at(TokenKind::At) && self.nth_kind(1) != Some(TokenKind::InterfaceKw) {
            self.bump();
            self.qualified_name()?;
            if self.at(TokenKind::LParen) {
                self.skip_group()?;
            }
        }
        Ok(())
    }

    fn modifiers(&mut self) -> Result<(Modifiers, bool), ParseError> {
        let mut modifiers = Modifiers::empty();
        let mut is_default = false;
        loop {
            self.skip_annotations()?;
            let Some(token) = self.peek() else {
                break;
            };
            if token.kind.is_modifier() {
                if token.kind == TokenKind::DefaultKw {
                    is_default = true;
                } else if let Some(modifier) = Modifiers::from_keyword(token.text) {
                    modifiers.insert(modifier);
                }
                self.bump();
            } else if self.at_contextual_modifier() {
                // sealed, non-sealed
                if self.bump().is_some_and(|t| t.text == "non") {
                    self.bump();
                    self.bump();
                }
            } else {
                break;
            }
        }
        Ok((modifiers, is_default))
    }

    fn at_contextual_modifier(&mut self) -> bool {
        if self.at_ident("sealed") {
            return matches!(
                self.nth_kind(1),
                Some(TokenKind::ClassKw | TokenKind::InterfaceKw)
            ) || self.nth_kind(1).is_some_and(TokenKind::is_modifier);
        }
        self.at_ident("non")
            && self.nth_kind(1) == Some(TokenKind::Operator)
            && self.tokens.get(self.pos + 2).is_some_and(|t| t.text == "sealed")
    }

    fn type_kind(&mut self) -> Option<TypeKind> {
        match self.peek_kind()? {
            TokenKind::ClassKw => Some(TypeKind::Class),
            TokenKind::InterfaceKw => Some(TypeKind::Interface),
            TokenKind::EnumKw => Some(TypeKind::Enum),
            TokenKind::At if self.nth_kind(1) == Some(TokenKind::InterfaceKw) => {
                Some(TypeKind::Annotation)
            }
            TokenKind::Ident
                if self.at_ident("record")
                    && self.nth_kind(1) == Some(TokenKind::Ident)
                    && matches!(self.nth_kind(2), Some(TokenKind::LParen | TokenKind::Lt)) =>
            {
                Some(TypeKind::Record)
            }
            _ => None,
        }
    }

    /// One member of a type body, or a top-level type when `owner` is `None`.
    fn member(
        &mut self,
        events: &mut impl ModelEvents,
        owner: Option<(&str, TypeKind)>,
    ) -> Result<(), SourceError> {
        self.skip_docs();
        let doc = self.doc.take();
        let (mut modifiers, is_default) = self.modifiers()?;

        if let Some(kind) = self.type_kind() {
            if let Some((_, TypeKind::Interface | TypeKind::Annotation)) = owner {
                modifiers.insert(Modifiers::STATIC);
                if !has_visibility(modifiers) {
                    modifiers.insert(Modifiers::PUBLIC);
                }
            }
            return self.type_declaration(events, kind, modifiers, doc);
        }

        let Some((owner_name, owner_kind)) = owner else {
            let token = self.peek();
            return Err(ParseError::new(
                format!("expected a type declaration, found `{}`", token.map_or("", |t| t.text)),
                token.map_or(TextSize::of(self.text), |t| t.offset),
            )
            .into());
        };

        // initializer block
        if self.at(TokenKind::LBrace) {
            return self.body(events);
        }

        let type_parameters = if self.at(TokenKind::Lt) {
            self.type_parameters()?
        } else {
            Vec::new()
        };

        let in_interface = matches!(owner_kind, TypeKind::Interface | TypeKind::Annotation);
        if in_interface && !has_visibility(modifiers) {
            modifiers.insert(Modifiers::PUBLIC);
        }

        // compact record constructor
        if owner_kind == TypeKind::Record
            && self.at_ident(owner_name)
            && self.nth_kind(1) == Some(TokenKind::LBrace)
        {
            self.bump();
            return self.body(events);
        }

        // constructor
        if self.at_ident(owner_name) && self.nth_kind(1) == Some(TokenKind::LParen) {
            self.bump();
            let mut decl = OperationDecl::new(owner_name).with_modifiers(modifiers);
            decl.type_parameters = type_parameters;
            decl.documentation = doc.map(str::to_string);
            return self.method_rest(events, decl, false);
        }

        let type_name = self.type_ref()?;
        let name_token = self.expect(TokenKind::Ident, "member name")?;

        if self.at(TokenKind::LParen) {
            let abstract_by_default = in_interface && !is_default && !modifiers.is_static();
            let mut decl = OperationDecl::new(name_token.text).with_modifiers(modifiers);
            decl.type_parameters = type_parameters;
            decl.documentation = doc.map(str::to_string);
            decl.params.push(ParamDecl::returns(type_name));
            return self.method_rest(events, decl, abstract_by_default);
        }

        if in_interface {
            modifiers.insert(Modifiers::STATIC);
            modifiers.insert(Modifiers::FINAL);
        }
        self.fields(events, modifiers, type_name, name_token.text, doc)
    }

    fn type_declaration(
        &mut self,
        events: &mut impl ModelEvents,
        kind: TypeKind,
        mut modifiers: Modifiers,
        doc: Option<&'a str>,
    ) -> Result<(), SourceError> {
        if kind == TypeKind::Annotation {
            self.bump();
        }
        self.bump();
        let name = self.expect_ident("type name")?;
        let mut decl = ClassDecl::new(name);
        if self.at(TokenKind::Lt) {
            decl.type_parameters = self.type_parameters()?;
        }
        let mut components = Vec::new();
        if kind == TypeKind::Record {
            modifiers.insert(Modifiers::FINAL);
            components = self.parameters()?;
        }
        decl.modifiers = modifiers;
        decl.documentation = doc.map(str::to_string);

        loop {
            match self.peek_kind() {
                Some(TokenKind::ExtendsKw) => {
                    self.bump();
                    let supertypes = self.type_list()?;
                    if kind == TypeKind::Interface {
                        decl.interfaces.extend(supertypes);
                    } else {
                        decl.superclass = supertypes.into_iter().next();
                    }
                }
                Some(TokenKind::ImplementsKw) => {
                    self.bump();
                    decl.interfaces.extend(self.type_list()?);
                }
                Some(TokenKind::Ident) if self.at_ident("permits") => {
                    self.bump();
                    self.type_list()?;
                }
                _ => break,
            }
        }

        match kind {
            TypeKind::Class | TypeKind::Record => events.add_class(&decl)?,
            TypeKind::Interface | TypeKind::Annotation => events.add_interface(&decl)?,
            TypeKind::Enum => events.add_enumeration(&decl)?,
        };

        for component in components {
            let field = AttributeDecl::new(component.name, component.type_name)
                .with_modifiers(Modifiers::PRIVATE | Modifiers::FINAL);
            events.add_attribute(&field)?;
        }

        self.expect(TokenKind::LBrace, "`{`")?;
        if kind == TypeKind::Enum {
            self.enum_constants(events)?;
        }
        self.type_body(events, name, kind)?;
        events.pop_classifier()?;
        Ok(())
    }

    /// Members up to and including the closing brace.
    fn type_body(
        &mut self,
        events: &mut impl ModelEvents,
        name: &str,
        kind: TypeKind,
    ) -> Result<(), SourceError> {
        loop {
            self.doc = None;
            if self.eat(TokenKind::RBrace) {
                return Ok(());
            }
            if self.eat(TokenKind::Semicolon) {
                continue;
            }
            if self.peek().is_none() {
                return Err(self.eof("`}`").into());
            }
            self.member(events, Some((name, kind)))?;
        }
    }

    fn enum_constants(&mut self, events: &mut impl ModelEvents) -> Result<(), SourceError> {
        loop {
            self.skip_annotations()?;
            if !self.at(TokenKind::Ident) {
                break;
            }
            let name = self.expect_ident("enum constant")?;
            events.add_enumeration_literal(name)?;
            if self.at(TokenKind::LParen) {
                self.skip_group()?;
            }
            if self.at(TokenKind::LBrace) {
                self.skip_group()?;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Semicolon);
        Ok(())
    }

    /// Parameters, `throws` and body of a method whose name is consumed.
    fn method_rest(
        &mut self,
        events: &mut impl ModelEvents,
        mut decl: OperationDecl,
        abstract_by_default: bool,
    ) -> Result<(), SourceError> {
        let returns = decl.params.clone();
        decl.params = self
            .parameters()?
            .into_iter()
            .map(|p| ParamDecl::input(p.name, p.type_name))
            .collect();
        // legacy `int f()[]`
        let mut dims = String::new();
        while self.at(TokenKind::LBracket) {
            self.bump();
            self.expect(TokenKind::RBracket, "`]`")?;
            dims.push_str("[]");
        }
        decl.params.extend(returns.into_iter().map(|mut r| {
            r.type_name.push_str(&dims);
            r
        }));

        let mut thrown = Vec::new();
        if self.eat(TokenKind::ThrowsKw) {
            thrown = self.type_list()?;
        }

        if self.eat(TokenKind::DefaultKw) {
            // annotation member default value
            while !self.at(TokenKind::Semicolon) {
                if self.peek().is_none() {
                    return Err(self.eof("`;`").into());
                }
                if matches!(self.peek_kind(), Some(TokenKind::LBrace | TokenKind::LParen)) {
                    self.skip_group()?;
                } else {
                    self.bump();
                }
            }
        }

        if self.eat(TokenKind::Semicolon) {
            if abstract_by_default {
                decl.modifiers.insert(Modifiers::ABSTRACT);
            }
            events.add_operation(&decl)?;
        } else {
            if !self.at(TokenKind::LBrace) {
                let found = self.peek().map_or("", |t| t.text);
                let offset = self.peek().map_or(TextSize::of(self.text), |t| t.offset);
                return Err(ParseError::new(format!("expected `{{` or `;`, found `{found}`"), offset).into());
            }
            let start = self.pos;
            self.skip_group()?;
            decl.body = Some(self.inner_text(start, self.pos).to_string());
            events.add_operation(&decl)?;
            self.pos = start;
            self.body(events)?;
        }

        for name in thrown {
            events.add_classifier_dependency(&name)?;
        }
        Ok(())
    }

    /// One or more field declarators sharing a type.
    fn fields(
        &mut self,
        events: &mut impl ModelEvents,
        modifiers: Modifiers,
        type_name: String,
        first: &'a str,
        doc: Option<&'a str>,
    ) -> Result<(), SourceError> {
        let mut name = first;
        loop {
            let mut field_type = type_name.clone();
            while self.eat(TokenKind::LBracket) {
                self.expect(TokenKind::RBracket, "`]`")?;
                field_type.push_str("[]");
            }
            let mut decl = AttributeDecl::new(name, field_type).with_modifiers(modifiers);
            decl.documentation = doc.map(str::to_string);

            let initializer = if self.eat(TokenKind::Eq) {
                Some(self.initializer()?)
            } else {
                None
            };
            if let Some((start, end)) = initializer {
                decl.initial_value = Some(self.span_text(start, end).to_string());
            }
            events.add_attribute(&decl)?;
            if let Some((start, end)) = initializer {
                let resume = self.pos;
                self.pos = start;
                self.scan_expression(events, end)?;
                self.pos = resume;
            }

            if self.eat(TokenKind::Comma) {
                name = self.expect_ident("field name")?;
                continue;
            }
            self.expect(TokenKind::Semicolon, "`;`")?;
            return Ok(());
        }
    }

    /// Token range of a field initializer, up to the `,` or `;` that ends it.
    fn initializer(&mut self) -> Result<(usize, usize), ParseError> {
        let start = self.pos;
        loop {
            match self.peek_kind() {
                None => return Err(self.eof("`;`")),
                Some(TokenKind::Semicolon) => break,
                Some(TokenKind::Comma) if self.starts_declarator() => break,
                Some(TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket) => {
                    self.skip_group()?
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        Ok((start, self.pos))
    }

    /// Whether the `,` at the cursor is followed by another declarator.
    fn starts_declarator(&mut self) -> bool {
        self.nth_kind(1) == Some(TokenKind::Ident)
            && matches!(
                self.nth_kind(2),
                Some(TokenKind::Eq | TokenKind::Comma | TokenKind::Semicolon | TokenKind::LBracket)
            )
    }

    /// Walk a `{ ... }` body for `new T(...)`.
    fn body(&mut self, events: &mut impl ModelEvents) -> Result<(), SourceError> {
        self.skip_docs();
        let start = self.pos;
        self.skip_group()?;
        let end = self.pos;
        self.pos = start;
        self.scan_expression(events, end)?;
        self.pos = end;
        Ok(())
    }

    /// Report `new T(...)` between the cursor and `end` as a dependency on
    /// `T`, or as an anonymous class when a body follows.
    fn scan_expression(&mut self, events: &mut impl ModelEvents, end: usize) -> Result<(), SourceError> {
        while self.pos < end {
            if !self.eat(TokenKind::NewKw) {
                self.pos += 1;
                continue;
            }
            self.skip_annotations()?;
            if !self.at(TokenKind::Ident) {
                continue;
            }
            let type_name = self.type_ref()?;
            if !self.at(TokenKind::LParen) {
                // array creation
                continue;
            }
            self.skip_group()?;
            let base = type_name.split('<').next().unwrap_or(&type_name);
            if self.at(TokenKind::LBrace) {
                events.add_anonymous_class(base)?;
                self.bump();
                self.type_body(events, "", TypeKind::Class)?;
                events.pop_classifier()?;
            } else if !is_primitive(base) {
                events.add_classifier_dependency(base)?;
            }
        }
        Ok(())
    }

    // ── Types ───────────────────────────────────────────────────────

    /// `<T extends A & B, U>`, returning the parameter names.
    fn type_parameters(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut names = Vec::new();
        loop {
            self.skip_annotations()?;
            names.push(self.expect_ident("type parameter")?.to_string());
            if self.eat(TokenKind::ExtendsKw) {
                self.type_ref()?;
                while self.eat(TokenKind::Amp) {
                    self.type_ref()?;
                }
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>`")?;
        Ok(names)
    }

    fn type_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut types = vec![self.type_ref()?];
        while self.eat(TokenKind::Comma) {
            types.push(self.type_ref()?);
        }
        Ok(types)
    }

    /// A type as written, e.g. `java.util.Map<K, ? extends V>[]` or `int...`.
    fn type_ref(&mut self) -> Result<String, ParseError> {
        self.skip_annotations()?;
        let mut text = self.expect_ident("type")?.to_string();
        loop {
            if self.at(TokenKind::Lt) {
                let start = self.pos;
                self.skip_angles()?;
                text.push_str(&self.type_arguments(start, self.pos));
            }
            if self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
                self.bump();
                text.push('.');
                text.push_str(self.expect_ident("type")?);
                continue;
            }
            break;
        }
        while self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
            self.bump();
            self.bump();
            text.push_str("[]");
        }
        if self.eat(TokenKind::Ellipsis) {
            text.push_str("...");
        }
        Ok(text)
    }

    /// Render `<...>` tokens with single spaces around bounds.
    fn type_arguments(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for token in &self.tokens[start..end] {
            match token.kind {
                TokenKind::ExtendsKw | TokenKind::Amp => {
                    text.push(' ');
                    text.push_str(token.text);
                    text.push(' ');
                }
                TokenKind::Ident if token.text == "super" => text.push_str(" super "),
                TokenKind::Comma => text.push_str(", "),
                _ if token.is_doc_comment() => {}
                _ => text.push_str(token.text),
            }
        }
        text
    }

    /// `(Type name, final Type... rest)` including the parentheses.
    fn parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Ok(params);
        }
        loop {
            self.modifiers()?;
            let mut type_name = self.type_ref()?;
            let name = self.expect_ident("parameter name")?;
            while self.eat(TokenKind::LBracket) {
                self.expect(TokenKind::RBracket, "`]`")?;
                type_name.push_str("[]");
            }
            // receiver parameter `Outer this`
            if name != "this" {
                params.push(Parameter {
                    name: name.to_string(),
                    type_name,
                });
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(params)
    }

    // ── Text ────────────────────────────────────────────────────────

    /// Source text covered by tokens `start..end`.
    fn span_text(&self, start: usize, end: usize) -> &'a str {
        match (self.tokens.get(start), end.checked_sub(1).and_then(|e| self.tokens.get(e))) {
            (Some(first), Some(last)) if start < end => {
                let from = u32::from(first.offset) as usize;
                let to = u32::from(last.range().end()) as usize;
                &self.text[from..to]
            }
            _ => "",
        }
    }

    /// Text strictly inside the brackets of the group `start..end`.
    fn inner_text(&self, start: usize, end: usize) -> &'a str {
        match (self.tokens.get(start), end.checked_sub(1).and_then(|e| self.tokens.get(e))) {
            (Some(open), Some(close)) if start < end => {
                let from = u32::from(open.range().end()) as usize;
                let to = u32::from(close.offset) as usize;
                self.text[from..to].trim()
            }
            _ => "",
        }
    }
}

struct Parameter {
    name: String,
    type_name: String,
}

fn has_visibility(modifiers: Modifiers) -> bool {
    modifiers.contains(Modifiers::PUBLIC)
        || modifiers.contains(Modifiers::PROTECTED)
        || modifiers.contains(Modifiers::PRIVATE)
}
