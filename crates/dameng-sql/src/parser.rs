//! MySQL statement parser and statement classifier.
//!
//! The parser is a hand-written recursive-descent parser over the token
//! stream from [`crate::tokens`], with precedence climbing for scalar
//! expressions. It covers the MySQL subset the translation engine
//! rewrites: SELECT (joins, index hints, UNION), INSERT/REPLACE with
//! multi-row VALUES or a SELECT source and ON DUPLICATE KEY UPDATE,
//! UPDATE, DELETE, CREATE TABLE, DROP TABLE, ALTER/RENAME/TRUNCATE
//! headers, CREATE/DROP DATABASE, and USE.
//!
//! Positional `?` bind markers are normalized to `:v1..:vN` in textual
//! order during parsing; the converter's re-binder depends on that
//! numbering scheme.

use crate::error::{Error, Result};
use crate::expressions::*;
use crate::tokens::{Token, TokenType, Tokenizer};
use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Words that terminate an expression and therefore cannot start a bare
/// column reference. Quoted identifiers are never reserved.
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "select", "from", "where", "group", "having", "order", "limit", "union", "all",
        "distinct", "and", "or", "not", "xor", "as", "asc", "desc", "on", "using", "join",
        "left", "right", "inner", "outer", "cross", "in", "is", "between", "like", "regexp",
        "case", "when", "then", "else", "end", "insert", "replace", "update", "delete", "set",
        "values", "into", "duplicate", "key", "exists", "force", "ignore", "use", "index", "by",
        "interval", "div", "mod", "null", "true", "false",
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Statement classifier
// ---------------------------------------------------------------------------

/// Cheap lexical classification of a statement, from its leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Ddl,
    DbDdl,
    Use,
    Other,
}

impl StatementKind {
    /// Whether the translation pipeline handles this kind at all.
    /// `Other` statements are passed through verbatim.
    pub fn convertible(&self) -> bool {
        !matches!(self, StatementKind::Other)
    }
}

/// Strip leading whitespace, `--`/`#` line comments, and `/* */` block
/// comments from the head of a statement.
pub(crate) fn strip_leading_comments(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        let trimmed = rest.trim_start();
        if let Some(after) = trimmed.strip_prefix("--").or_else(|| trimmed.strip_prefix('#')) {
            rest = match after.find('\n') {
                Some(pos) => &after[pos + 1..],
                None => "",
            };
        } else if let Some(after) = trimmed.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(pos) => &after[pos + 2..],
                None => "",
            };
        } else {
            return trimmed;
        }
    }
}

/// Classify a statement by sniffing its leading keyword (component A).
pub fn preview(sql: &str) -> StatementKind {
    let trimmed = strip_leading_comments(sql);
    // first alphabetic run
    let word: String = trimmed
        .chars()
        .skip_while(|c| !c.is_alphabetic())
        .take_while(|c| c.is_alphabetic() || *c == '_')
        .collect();
    let word = word.to_ascii_lowercase();
    let next_word = || -> String {
        let after = trimmed
            .trim_start_matches(|c: char| !c.is_alphabetic())
            .trim_start_matches(|c: char| c.is_alphabetic() || c == '_');
        after
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase()
    };
    match word.as_str() {
        "select" => StatementKind::Select,
        "insert" => StatementKind::Insert,
        "replace" => StatementKind::Replace,
        "update" => StatementKind::Update,
        "delete" => StatementKind::Delete,
        "create" | "drop" => {
            if matches!(next_word().as_str(), "database" | "schema") {
                StatementKind::DbDdl
            } else {
                StatementKind::Ddl
            }
        }
        "alter" | "rename" | "truncate" => StatementKind::Ddl,
        "use" => StatementKind::Use,
        _ => StatementKind::Other,
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single MySQL statement into its AST (component B).
pub fn parse(sql: &str) -> Result<Statement> {
    let tokens = Tokenizer::new().tokenize(sql)?;
    let mut parser = Parser {
        sql,
        tokens,
        pos: 0,
        next_arg: 1,
    };
    let statement = parser.parse_statement()?;
    parser.skip_semicolons();
    if !parser.is_at_end() {
        return Err(Error::parse(format!(
            "Unexpected trailing input at '{}'",
            parser.peek_text()
        )));
    }
    Ok(statement)
}

struct Parser<'a> {
    sql: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    next_arg: usize,
}

impl<'a> Parser<'a> {
    // -- token plumbing -----------------------------------------------------

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_text(&self) -> &str {
        self.peek().map(|t| t.text.as_str()).unwrap_or("<eof>")
    }

    fn peek_type(&self) -> Option<TokenType> {
        self.peek().map(|t| t.token_type)
    }

    fn advance(&mut self) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| Error::parse("Unexpected end of statement"))?;
        self.pos += 1;
        Ok(token)
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek_type() == Some(token_type)
    }

    fn accept(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType) -> Result<Token> {
        if self.check(token_type) {
            self.advance()
        } else {
            Err(Error::parse(format!(
                "Expected {:?}, found '{}'",
                token_type,
                self.peek_text()
            )))
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().map(|t| t.is_keyword(keyword)).unwrap_or(false)
    }

    fn at_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        self.peek_at(offset)
            .map(|t| t.is_keyword(keyword))
            .unwrap_or(false)
    }

    fn accept_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.accept_keyword(keyword) {
            Ok(())
        } else {
            Err(Error::parse(format!(
                "Expected '{}', found '{}'",
                keyword,
                self.peek_text()
            )))
        }
    }

    fn skip_semicolons(&mut self) {
        while self.accept(TokenType::Semicolon) {}
    }

    /// Drain block comments attached to the upcoming token. Called right
    /// after a statement verb so `insert /* c */ into ...` keeps its hint.
    fn take_comments(&mut self) -> Vec<String> {
        match self.tokens.get_mut(self.pos) {
            Some(token) => std::mem::take(&mut token.comments),
            None => Vec::new(),
        }
    }

    // -- identifiers --------------------------------------------------------

    fn parse_col_ident(&mut self) -> Result<ColIdent> {
        let token = self.advance()?;
        match token.token_type {
            TokenType::Identifier => Ok(ColIdent::new(token.text)),
            TokenType::QuotedIdentifier => Ok(ColIdent::quoted(token.text)),
            _ => Err(Error::parse(format!(
                "Expected identifier, found '{}'",
                token.text
            ))),
        }
    }

    fn parse_table_ident(&mut self) -> Result<TableIdent> {
        let token = self.advance()?;
        match token.token_type {
            TokenType::Identifier => Ok(TableIdent::new(token.text)),
            TokenType::QuotedIdentifier => Ok(TableIdent::quoted(token.text)),
            _ => Err(Error::parse(format!(
                "Expected table name, found '{}'",
                token.text
            ))),
        }
    }

    fn parse_table_name(&mut self) -> Result<TableName> {
        let first = self.parse_table_ident()?;
        if self.accept(TokenType::Dot) {
            let name = self.parse_table_ident()?;
            Ok(TableName {
                qualifier: Some(first),
                name,
            })
        } else {
            Ok(TableName::new(first))
        }
    }

    /// True when the upcoming identifier token can start a column
    /// reference (not reserved, unless backtick-quoted).
    fn at_name(&self) -> bool {
        match self.peek() {
            Some(t) if t.token_type == TokenType::QuotedIdentifier => true,
            Some(t) if t.token_type == TokenType::Identifier => {
                !RESERVED.contains(t.text.to_ascii_lowercase().as_str())
            }
            _ => false,
        }
    }

    // -- statements ---------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement> {
        if self.at_keyword("select") {
            let select = self.parse_select_with_unions()?;
            return Ok(Statement::Select(Box::new(select)));
        }
        if self.at_keyword("insert") || self.at_keyword("replace") {
            return self.parse_insert();
        }
        if self.at_keyword("update") {
            return self.parse_update();
        }
        if self.at_keyword("delete") {
            return self.parse_delete();
        }
        if self.at_keyword("create") {
            return self.parse_create();
        }
        if self.at_keyword("drop") {
            return self.parse_drop();
        }
        if self.at_keyword("alter") {
            return self.parse_alter();
        }
        if self.at_keyword("rename") {
            return self.parse_rename();
        }
        if self.at_keyword("truncate") {
            return self.parse_truncate();
        }
        if self.at_keyword("use") {
            self.pos += 1;
            let db_name = self.parse_table_ident()?;
            return Ok(Statement::Use(Box::new(Use { db_name })));
        }
        Err(Error::parse(format!(
            "Unsupported statement starting with '{}'",
            self.peek_text()
        )))
    }

    // -- SELECT -------------------------------------------------------------

    fn parse_select_with_unions(&mut self) -> Result<Select> {
        let mut select = self.parse_select_body()?;
        while self.at_keyword("union") {
            self.pos += 1;
            let all = self.accept_keyword("all");
            if !all {
                self.accept_keyword("distinct");
            }
            let next = self.parse_select_body()?;
            select.unions.push(Union { all, select: next });
        }
        Ok(select)
    }

    fn parse_select_body(&mut self) -> Result<Select> {
        self.expect_keyword("select")?;
        let comments = self.take_comments();
        let distinct = self.accept_keyword("distinct");
        if !distinct {
            self.accept_keyword("all");
        }

        let mut exprs = vec![self.parse_select_expr()?];
        while self.accept(TokenType::Comma) {
            exprs.push(self.parse_select_expr()?);
        }

        let mut select = Select {
            comments,
            distinct,
            exprs,
            ..Select::default()
        };

        if self.accept_keyword("from") {
            select.from = self.parse_table_exprs()?;
        }
        if self.accept_keyword("where") {
            select.where_expr = Some(self.parse_expression()?);
        }
        if self.at_keyword("group") {
            self.pos += 1;
            self.expect_keyword("by")?;
            select.group_by.push(self.parse_expression()?);
            while self.accept(TokenType::Comma) {
                select.group_by.push(self.parse_expression()?);
            }
        }
        if self.accept_keyword("having") {
            select.having = Some(self.parse_expression()?);
        }
        select.order_by = self.parse_order_by()?;
        select.limit = self.parse_limit()?;
        Ok(select)
    }

    fn parse_select_expr(&mut self) -> Result<SelectExpr> {
        if self.accept(TokenType::Star) {
            return Ok(SelectExpr::Star);
        }
        // table.* / db.table.*
        if self.at_name()
            && self.peek_at(1).map(|t| t.token_type) == Some(TokenType::Dot)
            && self.peek_at(2).map(|t| t.token_type) == Some(TokenType::Star)
        {
            let table = self.parse_table_ident()?;
            self.expect(TokenType::Dot)?;
            self.expect(TokenType::Star)?;
            return Ok(SelectExpr::QualifiedStar(TableName::new(table)));
        }
        let expr = self.parse_expression()?;
        let alias = if self.accept_keyword("as") {
            Some(self.parse_col_ident()?)
        } else if self.at_name() {
            Some(self.parse_col_ident()?)
        } else {
            None
        };
        Ok(SelectExpr::Expr { expr, alias })
    }

    fn parse_order_by(&mut self) -> Result<Vec<Order>> {
        let mut orders = Vec::new();
        if self.at_keyword("order") {
            self.pos += 1;
            self.expect_keyword("by")?;
            loop {
                let expr = self.parse_expression()?;
                let direction = if self.accept_keyword("desc") {
                    OrderDirection::Desc
                } else {
                    self.accept_keyword("asc");
                    OrderDirection::Asc
                };
                orders.push(Order { expr, direction });
                if !self.accept(TokenType::Comma) {
                    break;
                }
            }
        }
        Ok(orders)
    }

    fn parse_limit(&mut self) -> Result<Option<Limit>> {
        if !self.accept_keyword("limit") {
            return Ok(None);
        }
        let first = self.parse_simple_value()?;
        if self.accept(TokenType::Comma) {
            let count = self.parse_simple_value()?;
            Ok(Some(Limit {
                offset: Some(first),
                count,
            }))
        } else if self.accept_keyword("offset") {
            let offset = self.parse_simple_value()?;
            Ok(Some(Limit {
                offset: Some(offset),
                count: first,
            }))
        } else {
            Ok(Some(Limit {
                offset: None,
                count: first,
            }))
        }
    }

    fn parse_simple_value(&mut self) -> Result<Expr> {
        match self.peek_type() {
            Some(TokenType::Number) => {
                let token = self.advance()?;
                Ok(Expr::Val(SqlVal::int(token.text)))
            }
            Some(TokenType::Placeholder) => {
                let token = self.advance()?;
                Ok(Expr::Val(self.placeholder_val(&token)))
            }
            _ => Err(Error::parse(format!(
                "Expected number or bind marker, found '{}'",
                self.peek_text()
            ))),
        }
    }

    // -- FROM / table expressions -------------------------------------------

    fn parse_table_exprs(&mut self) -> Result<Vec<TableExpr>> {
        let mut exprs = vec![self.parse_table_expr()?];
        while self.accept(TokenType::Comma) {
            exprs.push(self.parse_table_expr()?);
        }
        Ok(exprs)
    }

    fn parse_table_expr(&mut self) -> Result<TableExpr> {
        let mut left = self.parse_table_factor()?;
        loop {
            let kind = if self.at_keyword("join") {
                self.pos += 1;
                JoinKind::Join
            } else if self.at_keyword("inner") && self.at_keyword_at(1, "join") {
                self.pos += 2;
                JoinKind::Join
            } else if self.at_keyword("cross") && self.at_keyword_at(1, "join") {
                self.pos += 2;
                JoinKind::CrossJoin
            } else if self.at_keyword("left") {
                self.pos += 1;
                self.accept_keyword("outer");
                self.expect_keyword("join")?;
                JoinKind::LeftJoin
            } else if self.at_keyword("right") {
                self.pos += 1;
                self.accept_keyword("outer");
                self.expect_keyword("join")?;
                JoinKind::RightJoin
            } else {
                break;
            };
            let right = self.parse_table_factor()?;
            let on = if self.accept_keyword("on") {
                Some(self.parse_expression()?)
            } else {
                None
            };
            left = TableExpr::Join(Box::new(JoinTableExpr {
                left,
                kind,
                right,
                on,
            }));
        }
        Ok(left)
    }

    fn parse_table_factor(&mut self) -> Result<TableExpr> {
        if self.accept(TokenType::LParen) {
            let select = self.parse_select_with_unions()?;
            self.expect(TokenType::RParen)?;
            self.accept_keyword("as");
            let alias = if self.at_name() {
                Some(self.parse_table_ident()?)
            } else {
                None
            };
            return Ok(TableExpr::Aliased(AliasedTableExpr {
                expr: SimpleTableExpr::Subquery(Box::new(select)),
                alias,
                hints: None,
            }));
        }

        let name = self.parse_table_name()?;
        let alias = if self.accept_keyword("as") {
            Some(self.parse_table_ident()?)
        } else if self.at_name() {
            Some(self.parse_table_ident()?)
        } else {
            None
        };
        let hints = self.parse_index_hints()?;
        Ok(TableExpr::Aliased(AliasedTableExpr {
            expr: SimpleTableExpr::Table(name),
            alias,
            hints,
        }))
    }

    fn parse_index_hints(&mut self) -> Result<Option<IndexHints>> {
        let hint_type = if self.at_keyword("use") && self.at_keyword_at(1, "index") {
            "use "
        } else if self.at_keyword("ignore") && self.at_keyword_at(1, "index") {
            "ignore "
        } else if self.at_keyword("force") && self.at_keyword_at(1, "index") {
            "force "
        } else {
            return Ok(None);
        };
        self.pos += 2;
        self.expect(TokenType::LParen)?;
        let mut indexes = vec![self.parse_col_ident()?];
        while self.accept(TokenType::Comma) {
            indexes.push(self.parse_col_ident()?);
        }
        self.expect(TokenType::RParen)?;
        Ok(Some(IndexHints {
            hint_type: hint_type.to_string(),
            indexes,
        }))
    }

    // -- INSERT / REPLACE ---------------------------------------------------

    fn parse_insert(&mut self) -> Result<Statement> {
        let action = if self.accept_keyword("replace") {
            InsertAction::Replace
        } else {
            self.expect_keyword("insert")?;
            InsertAction::Insert
        };
        let comments = self.take_comments();
        self.accept_keyword("ignore");
        self.accept_keyword("into");
        let table = self.parse_table_name()?;

        let mut columns = Vec::new();
        if self.check(TokenType::LParen) && !self.at_keyword_at(1, "select") {
            self.expect(TokenType::LParen)?;
            columns.push(self.parse_col_ident()?);
            while self.accept(TokenType::Comma) {
                columns.push(self.parse_col_ident()?);
            }
            self.expect(TokenType::RParen)?;
        }

        let rows = if self.accept_keyword("values") || self.accept_keyword("value") {
            let mut rows = vec![self.parse_row_tuple()?];
            while self.accept(TokenType::Comma) {
                rows.push(self.parse_row_tuple()?);
            }
            InsertRows::Values(rows)
        } else if self.at_keyword("select") {
            InsertRows::Select(Box::new(self.parse_select_with_unions()?))
        } else if self.accept(TokenType::LParen) {
            let select = self.parse_select_with_unions()?;
            self.expect(TokenType::RParen)?;
            InsertRows::Select(Box::new(select))
        } else {
            return Err(Error::parse(format!(
                "Expected VALUES or SELECT, found '{}'",
                self.peek_text()
            )));
        };

        let mut on_dup = Vec::new();
        if self.at_keyword("on") {
            self.pos += 1;
            self.expect_keyword("duplicate")?;
            self.expect_keyword("key")?;
            self.expect_keyword("update")?;
            on_dup = self.parse_update_exprs()?;
        }

        Ok(Statement::Insert(Box::new(Insert {
            action,
            comments,
            table,
            columns,
            rows,
            on_dup,
        })))
    }

    fn parse_row_tuple(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenType::LParen)?;
        let mut row = vec![self.parse_expression()?];
        while self.accept(TokenType::Comma) {
            row.push(self.parse_expression()?);
        }
        self.expect(TokenType::RParen)?;
        Ok(row)
    }

    fn parse_update_exprs(&mut self) -> Result<Vec<UpdateExpr>> {
        let mut exprs = vec![self.parse_update_expr()?];
        while self.accept(TokenType::Comma) {
            exprs.push(self.parse_update_expr()?);
        }
        Ok(exprs)
    }

    fn parse_update_expr(&mut self) -> Result<UpdateExpr> {
        let name = self.parse_col_name()?;
        self.expect(TokenType::Eq)?;
        let expr = self.parse_expression()?;
        Ok(UpdateExpr { name, expr })
    }

    fn parse_col_name(&mut self) -> Result<ColName> {
        let first = self.parse_col_ident()?;
        if self.accept(TokenType::Dot) {
            let second = self.parse_col_ident()?;
            if self.accept(TokenType::Dot) {
                let third = self.parse_col_ident()?;
                return Ok(ColName {
                    qualifier: Some(TableName {
                        qualifier: Some(TableIdent {
                            name: first.name,
                            quoted: first.quoted,
                        }),
                        name: TableIdent {
                            name: second.name,
                            quoted: second.quoted,
                        },
                    }),
                    name: third,
                });
            }
            return Ok(ColName {
                qualifier: Some(TableName::new(TableIdent {
                    name: first.name,
                    quoted: first.quoted,
                })),
                name: second,
            });
        }
        Ok(ColName::bare(first))
    }

    // -- UPDATE / DELETE ----------------------------------------------------

    fn parse_update(&mut self) -> Result<Statement> {
        self.expect_keyword("update")?;
        let comments = self.take_comments();
        let table_exprs = self.parse_table_exprs()?;
        self.expect_keyword("set")?;
        let exprs = self.parse_update_exprs()?;
        let where_expr = if self.accept_keyword("where") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let limit = self.parse_limit()?;
        Ok(Statement::Update(Box::new(Update {
            comments,
            table_exprs,
            exprs,
            where_expr,
            order_by,
            limit,
        })))
    }

    fn parse_delete(&mut self) -> Result<Statement> {
        self.expect_keyword("delete")?;
        let comments = self.take_comments();
        self.expect_keyword("from")?;
        let table_exprs = self.parse_table_exprs()?;
        let where_expr = if self.accept_keyword("where") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let limit = self.parse_limit()?;
        Ok(Statement::Delete(Box::new(Delete {
            comments,
            table_exprs,
            where_expr,
            order_by,
            limit,
        })))
    }

    // -- DDL ----------------------------------------------------------------

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect_keyword("create")?;
        if self.at_keyword("database") || self.at_keyword("schema") {
            self.pos += 1;
            return self.parse_db_ddl(DbDdlAction::Create);
        }
        self.expect_keyword("table")?;
        // IF NOT EXISTS is accepted and dropped; DM create has no use for it
        if self.at_keyword("if") {
            self.pos += 1;
            self.expect_keyword("not")?;
            self.expect_keyword("exists")?;
        }
        let name = self.parse_table_name()?;
        let table_spec = Some(self.parse_table_spec()?);
        Ok(Statement::Ddl(Box::new(Ddl {
            action: DdlAction::Create,
            table: name.clone(),
            new_name: name,
            if_exists: false,
            table_spec,
        })))
    }

    fn parse_table_spec(&mut self) -> Result<TableSpec> {
        self.expect(TokenType::LParen)?;
        let mut columns = Vec::new();
        let mut indexes = Vec::new();
        loop {
            if self.at_keyword("primary") {
                self.pos += 1;
                self.expect_keyword("key")?;
                let cols = self.parse_index_columns()?;
                indexes.push(IndexDefinition {
                    primary: true,
                    type_name: "primary key".to_string(),
                    name: None,
                    columns: cols,
                });
            } else if self.at_keyword("unique") {
                self.pos += 1;
                let keyed = self.accept_keyword("key") || self.accept_keyword("index");
                let name = if self.at_name() {
                    Some(self.parse_col_ident()?)
                } else {
                    None
                };
                let cols = self.parse_index_columns()?;
                indexes.push(IndexDefinition {
                    primary: false,
                    type_name: if keyed { "unique key" } else { "unique" }.to_string(),
                    name,
                    columns: cols,
                });
            } else if self.at_keyword("key") || self.at_keyword("index") {
                self.pos += 1;
                let name = if self.at_name() {
                    Some(self.parse_col_ident()?)
                } else {
                    None
                };
                let cols = self.parse_index_columns()?;
                indexes.push(IndexDefinition {
                    primary: false,
                    type_name: "key".to_string(),
                    name,
                    columns: cols,
                });
            } else if self.at_keyword("constraint") || self.at_keyword("foreign") {
                // constraints are lifted out before parsing; tolerate
                // any that remain by skipping the definition
                self.skip_table_spec_item()?;
            } else {
                columns.push(self.parse_column_definition()?);
            }

            if self.accept(TokenType::Comma) {
                continue;
            }
            self.expect(TokenType::RParen)?;
            break;
        }

        let options = self.capture_table_options();
        Ok(TableSpec {
            columns,
            indexes,
            options,
        })
    }

    /// Skip one column/constraint definition: everything up to the next
    /// comma or closing paren at depth zero. Leaves that token pending.
    fn skip_table_spec_item(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.peek_type() {
                None => return Err(Error::parse("Unterminated table definition")),
                Some(TokenType::LParen) => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(TokenType::RParen) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                    self.pos += 1;
                }
                Some(TokenType::Comma) if depth == 0 => return Ok(()),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_index_columns(&mut self) -> Result<Vec<IndexColumn>> {
        self.expect(TokenType::LParen)?;
        let mut cols = Vec::new();
        loop {
            let column = self.parse_col_ident()?;
            let length = if self.accept(TokenType::LParen) {
                let token = self.expect(TokenType::Number)?;
                self.expect(TokenType::RParen)?;
                Some(SqlVal::int(token.text))
            } else {
                None
            };
            cols.push(IndexColumn { column, length });
            if !self.accept(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;
        Ok(cols)
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition> {
        let name = self.parse_col_ident()?;
        let type_token = self.advance()?;
        if type_token.token_type != TokenType::Identifier {
            return Err(Error::parse(format!(
                "Expected column type, found '{}'",
                type_token.text
            )));
        }
        let mut typ = ColumnType::new(type_token.text.to_ascii_lowercase());

        if typ.type_name == "enum" || typ.type_name == "set" {
            self.expect(TokenType::LParen)?;
            loop {
                let value = self.expect(TokenType::String)?;
                typ.enum_values.push(value.text);
                if !self.accept(TokenType::Comma) {
                    break;
                }
            }
            self.expect(TokenType::RParen)?;
        } else if self.accept(TokenType::LParen) {
            let length = self.expect(TokenType::Number)?;
            typ.length = Some(SqlVal::int(length.text));
            if self.accept(TokenType::Comma) {
                let scale = self.expect(TokenType::Number)?;
                typ.scale = Some(SqlVal::int(scale.text));
            }
            self.expect(TokenType::RParen)?;
        }

        loop {
            if self.accept_keyword("unsigned") {
                typ.unsigned = true;
            } else if self.accept_keyword("zerofill") {
                typ.zerofill = true;
            } else if self.at_keyword("not") {
                self.pos += 1;
                self.expect_keyword("null")?;
                typ.not_null = true;
            } else if self.accept_keyword("null") {
                typ.not_null = false;
            } else if self.at_keyword("default") {
                self.pos += 1;
                typ.default = Some(self.parse_default_value()?);
            } else if self.at_keyword("on") {
                self.pos += 1;
                self.expect_keyword("update")?;
                self.expect_keyword("current_timestamp")?;
                if self.accept(TokenType::LParen) {
                    self.accept(TokenType::Number);
                    self.expect(TokenType::RParen)?;
                }
                typ.on_update = true;
            } else if self.accept_keyword("auto_increment") {
                typ.autoincrement = true;
            } else if self.at_keyword("primary") {
                self.pos += 1;
                self.expect_keyword("key")?;
                typ.key_opt = ColumnKeyOption::Primary;
            } else if self.at_keyword("unique") {
                self.pos += 1;
                if self.accept_keyword("key") {
                    typ.key_opt = ColumnKeyOption::UniqueKey;
                } else {
                    typ.key_opt = ColumnKeyOption::Unique;
                }
            } else if self.accept_keyword("key") {
                typ.key_opt = ColumnKeyOption::Key;
            } else if self.at_keyword("comment") {
                self.pos += 1;
                let value = self.expect(TokenType::String)?;
                typ.comment = Some(SqlVal::string(value.text));
            } else if self.at_keyword("character") {
                self.pos += 1;
                self.expect_keyword("set")?;
                typ.charset = self.parse_col_ident()?.name;
            } else if self.accept_keyword("charset") {
                typ.charset = self.parse_col_ident()?.name;
            } else if self.accept_keyword("collate") {
                typ.collate = self.parse_col_ident()?.name;
            } else {
                break;
            }
        }

        Ok(ColumnDefinition { name, typ })
    }

    fn parse_default_value(&mut self) -> Result<DefaultValue> {
        if self.accept_keyword("null") {
            return Ok(DefaultValue::Null);
        }
        if self.accept_keyword("current_timestamp") {
            if self.accept(TokenType::LParen) {
                self.accept(TokenType::Number);
                self.expect(TokenType::RParen)?;
            }
            return Ok(DefaultValue::CurrentTimestamp);
        }
        let negative = self.accept(TokenType::Dash);
        let token = self.advance()?;
        let val = match token.token_type {
            TokenType::String => SqlVal::string(token.text),
            TokenType::Number => {
                let text = if negative {
                    format!("-{}", token.text)
                } else {
                    token.text
                };
                return Ok(DefaultValue::Literal(SqlVal::int(text)));
            }
            TokenType::HexNumber => SqlVal::new(ValKind::Hex, token.text),
            TokenType::Identifier => SqlVal::new(ValKind::Str, token.text),
            _ => {
                return Err(Error::parse(format!(
                    "Unsupported default value '{}'",
                    token.text
                )))
            }
        };
        Ok(DefaultValue::Literal(val))
    }

    /// Capture everything after the closing paren of a CREATE TABLE body
    /// as the raw, lowercased options blob.
    fn capture_table_options(&mut self) -> String {
        let start = match self.peek() {
            Some(token) if token.token_type != TokenType::Semicolon => token.span.start,
            _ => {
                self.skip_semicolons();
                return String::new();
            }
        };
        self.pos = self.tokens.len();
        let raw = self.sql[start..].trim_end();
        let raw = raw.strip_suffix(';').unwrap_or(raw).trim_end();
        format!(" {}", raw.to_ascii_lowercase())
    }

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect_keyword("drop")?;
        if self.at_keyword("database") || self.at_keyword("schema") {
            self.pos += 1;
            return self.parse_db_ddl(DbDdlAction::Drop);
        }
        self.expect_keyword("table")?;
        let mut if_exists = false;
        if self.at_keyword("if") {
            self.pos += 1;
            self.expect_keyword("exists")?;
            if_exists = true;
        }
        let table = self.parse_table_name()?;
        Ok(Statement::Ddl(Box::new(Ddl {
            action: DdlAction::Drop,
            table: table.clone(),
            new_name: table,
            if_exists,
            table_spec: None,
        })))
    }

    fn parse_alter(&mut self) -> Result<Statement> {
        self.expect_keyword("alter")?;
        self.expect_keyword("table")?;
        let table = self.parse_table_name()?;
        // the ALTER body is not rewritten; the converter re-emits the
        // original text, so the remainder is consumed unparsed
        self.pos = self.tokens.len();
        Ok(Statement::Ddl(Box::new(Ddl {
            action: DdlAction::Alter,
            table: table.clone(),
            new_name: table,
            if_exists: false,
            table_spec: None,
        })))
    }

    fn parse_rename(&mut self) -> Result<Statement> {
        self.expect_keyword("rename")?;
        self.expect_keyword("table")?;
        let table = self.parse_table_name()?;
        self.expect_keyword("to")?;
        let new_name = self.parse_table_name()?;
        Ok(Statement::Ddl(Box::new(Ddl {
            action: DdlAction::Rename,
            table,
            new_name,
            if_exists: false,
            table_spec: None,
        })))
    }

    fn parse_truncate(&mut self) -> Result<Statement> {
        self.expect_keyword("truncate")?;
        self.accept_keyword("table");
        let table = self.parse_table_name()?;
        Ok(Statement::Ddl(Box::new(Ddl {
            action: DdlAction::Truncate,
            table: table.clone(),
            new_name: table,
            if_exists: false,
            table_spec: None,
        })))
    }

    fn parse_db_ddl(&mut self, action: DbDdlAction) -> Result<Statement> {
        let mut if_exists = false;
        let mut if_not_exists = false;
        if self.at_keyword("if") {
            self.pos += 1;
            if self.accept_keyword("not") {
                self.expect_keyword("exists")?;
                if_not_exists = true;
            } else {
                self.expect_keyword("exists")?;
                if_exists = true;
            }
        }
        let name = self.parse_table_ident()?.name;
        let mut charset = String::new();
        let mut collate = String::new();
        loop {
            self.accept_keyword("default");
            if self.at_keyword("character") {
                self.pos += 1;
                self.expect_keyword("set")?;
                self.accept(TokenType::Eq);
                charset = self.parse_col_ident()?.name;
            } else if self.accept_keyword("charset") {
                self.accept(TokenType::Eq);
                charset = self.parse_col_ident()?.name;
            } else if self.accept_keyword("collate") {
                self.accept(TokenType::Eq);
                collate = self.parse_col_ident()?.name;
            } else {
                break;
            }
        }
        Ok(Statement::DbDdl(Box::new(DbDdl {
            action,
            name,
            if_exists,
            if_not_exists,
            charset,
            collate,
        })))
    }

    // -- expressions --------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.accept_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_not()?;
        while self.accept_keyword("and") {
            let right = self.parse_not()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.accept_keyword("not") {
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> Result<Expr> {
        let left = self.parse_additive()?;

        let compare_op = match self.peek_type() {
            Some(TokenType::Eq) => Some(CompareOp::Eq),
            Some(TokenType::Neq) => Some(CompareOp::Ne),
            Some(TokenType::Lt) => Some(CompareOp::Lt),
            Some(TokenType::Lte) => Some(CompareOp::Le),
            Some(TokenType::Gt) => Some(CompareOp::Gt),
            Some(TokenType::Gte) => Some(CompareOp::Ge),
            Some(TokenType::NullSafeEq) => Some(CompareOp::NullSafeEq),
            _ => None,
        };
        if let Some(op) = compare_op {
            self.pos += 1;
            let right = self.parse_additive()?;
            return Ok(Expr::Comparison {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        let negated = if self.at_keyword("not")
            && (self.at_keyword_at(1, "in")
                || self.at_keyword_at(1, "like")
                || self.at_keyword_at(1, "between"))
        {
            self.pos += 1;
            true
        } else {
            false
        };

        if self.accept_keyword("in") {
            self.expect(TokenType::LParen)?;
            let list = if self.at_keyword("select") {
                let select = self.parse_select_with_unions()?;
                Expr::Subquery(Box::new(select))
            } else {
                let mut items = vec![self.parse_expression()?];
                while self.accept(TokenType::Comma) {
                    items.push(self.parse_expression()?);
                }
                Expr::Tuple(items)
            };
            self.expect(TokenType::RParen)?;
            return Ok(Expr::In {
                expr: Box::new(left),
                list: Box::new(list),
                negated,
            });
        }
        if self.accept_keyword("like") {
            let right = self.parse_additive()?;
            return Ok(Expr::Like {
                left: Box::new(left),
                right: Box::new(right),
                negated,
            });
        }
        if self.accept_keyword("between") {
            let low = self.parse_additive()?;
            self.expect_keyword("and")?;
            let high = self.parse_additive()?;
            return Ok(Expr::Between {
                expr: Box::new(left),
                low: Box::new(low),
                high: Box::new(high),
                negated,
            });
        }
        if self.at_keyword("is") {
            self.pos += 1;
            let check = if self.accept_keyword("not") {
                self.expect_keyword("null")?;
                IsCheck::NotNull
            } else {
                self.expect_keyword("null")?;
                IsCheck::Null
            };
            return Ok(Expr::Is {
                expr: Box::new(left),
                check,
            });
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_type() {
                Some(TokenType::Plus) => BinaryOp::Add,
                Some(TokenType::Dash) => BinaryOp::Sub,
                Some(TokenType::Amp) => BinaryOp::BitAnd,
                Some(TokenType::Pipe) => BinaryOp::BitOr,
                Some(TokenType::Caret) => BinaryOp::BitXor,
                Some(TokenType::ShiftLeft) => BinaryOp::ShiftLeft,
                Some(TokenType::ShiftRight) => BinaryOp::ShiftRight,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_type() {
                Some(TokenType::Star) => BinaryOp::Mul,
                Some(TokenType::Slash) => BinaryOp::Div,
                Some(TokenType::Percent) => BinaryOp::Mod,
                _ => {
                    if self.at_keyword("div") {
                        BinaryOp::Div
                    } else if self.at_keyword("mod") {
                        BinaryOp::Mod
                    } else {
                        break;
                    }
                }
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.accept(TokenType::Dash) {
            let inner = self.parse_unary()?;
            return Ok(Expr::UnaryMinus(Box::new(inner)));
        }
        if self.accept(TokenType::Plus) {
            return self.parse_unary();
        }
        if self.accept(TokenType::Bang) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| Error::parse("Unexpected end of expression"))?;

        match token.token_type {
            TokenType::Number => {
                self.pos += 1;
                let kind = if token.text.contains('.')
                    || token.text.contains('e')
                    || token.text.contains('E')
                {
                    ValKind::Float
                } else {
                    ValKind::Int
                };
                Ok(Expr::Val(SqlVal::new(kind, token.text)))
            }
            TokenType::HexNumber => {
                self.pos += 1;
                Ok(Expr::Val(SqlVal::new(ValKind::Hex, token.text)))
            }
            TokenType::String => {
                self.pos += 1;
                Ok(Expr::Val(SqlVal::string(token.text)))
            }
            TokenType::Placeholder => {
                self.pos += 1;
                Ok(Expr::Val(self.placeholder_val(&token)))
            }
            TokenType::LParen => {
                self.pos += 1;
                if self.at_keyword("select") {
                    let select = self.parse_select_with_unions()?;
                    self.expect(TokenType::RParen)?;
                    return Ok(Expr::Subquery(Box::new(select)));
                }
                let mut items = vec![self.parse_expression()?];
                while self.accept(TokenType::Comma) {
                    items.push(self.parse_expression()?);
                }
                self.expect(TokenType::RParen)?;
                if items.len() == 1 {
                    Ok(Expr::Paren(Box::new(items.pop().expect("non-empty"))))
                } else {
                    Ok(Expr::Tuple(items))
                }
            }
            TokenType::QuotedIdentifier => self.parse_column_or_function(),
            TokenType::Identifier => {
                let lowered = token.text.to_ascii_lowercase();
                match lowered.as_str() {
                    "null" => {
                        self.pos += 1;
                        Ok(Expr::Null)
                    }
                    "true" => {
                        self.pos += 1;
                        Ok(Expr::Boolean(true))
                    }
                    "false" => {
                        self.pos += 1;
                        Ok(Expr::Boolean(false))
                    }
                    "case" => self.parse_case(),
                    "exists" => {
                        self.pos += 1;
                        self.expect(TokenType::LParen)?;
                        let select = self.parse_select_with_unions()?;
                        self.expect(TokenType::RParen)?;
                        Ok(Expr::Exists(Box::new(select)))
                    }
                    "interval" => Err(Error::parse("INTERVAL expressions are not supported")),
                    _ => {
                        // reserved words may still be function names
                        // (e.g. `values(col)` in ON DUPLICATE KEY UPDATE)
                        let is_call =
                            self.peek_at(1).map(|t| t.token_type) == Some(TokenType::LParen);
                        if RESERVED.contains(lowered.as_str()) && !is_call {
                            return Err(Error::parse(format!(
                                "Unexpected keyword '{}' in expression",
                                token.text
                            )));
                        }
                        self.parse_column_or_function()
                    }
                }
            }
            _ => Err(Error::parse(format!(
                "Unexpected token '{}' in expression",
                token.text
            ))),
        }
    }

    fn parse_case(&mut self) -> Result<Expr> {
        self.expect_keyword("case")?;
        let operand = if self.at_keyword("when") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let mut whens = Vec::new();
        while self.accept_keyword("when") {
            let cond = self.parse_expression()?;
            self.expect_keyword("then")?;
            let value = self.parse_expression()?;
            whens.push((cond, value));
        }
        let else_expr = if self.accept_keyword("else") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_keyword("end")?;
        Ok(Expr::Case(Box::new(CaseExpr {
            operand,
            whens,
            else_expr,
        })))
    }

    fn parse_column_or_function(&mut self) -> Result<Expr> {
        let first = self.parse_col_ident()?;
        if self.check(TokenType::LParen) && !first.quoted {
            self.pos += 1;
            let mut args = Vec::new();
            let mut distinct = false;
            if !self.check(TokenType::RParen) {
                if self.accept(TokenType::Star) {
                    args.push(Expr::Star);
                } else {
                    distinct = self.accept_keyword("distinct");
                    args.push(self.parse_expression()?);
                    while self.accept(TokenType::Comma) {
                        args.push(self.parse_expression()?);
                    }
                }
            }
            self.expect(TokenType::RParen)?;
            return Ok(Expr::Func(Box::new(FuncExpr {
                name: first.name,
                distinct,
                args,
            })));
        }

        if self.check(TokenType::Dot) {
            self.pos -= 1;
            let name = self.parse_col_name()?;
            return Ok(Expr::Column(name));
        }
        Ok(Expr::Column(ColName::bare(first)))
    }

    fn placeholder_val(&mut self, token: &Token) -> SqlVal {
        if token.text == "?" {
            let val = SqlVal::placeholder(format!(":v{}", self.next_arg));
            self.next_arg += 1;
            val
        } else {
            SqlVal::placeholder(token.text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_kinds() {
        assert_eq!(preview("select 1"), StatementKind::Select);
        assert_eq!(preview("  INSERT INTO t values (1)"), StatementKind::Insert);
        assert_eq!(preview("replace into t values (1)"), StatementKind::Replace);
        assert_eq!(preview("UPDATE t set a = 1"), StatementKind::Update);
        assert_eq!(preview("delete from t"), StatementKind::Delete);
        assert_eq!(preview("CREATE TABLE t (a int)"), StatementKind::Ddl);
        assert_eq!(preview("drop table t"), StatementKind::Ddl);
        assert_eq!(preview("alter table t add c int"), StatementKind::Ddl);
        assert_eq!(preview("create database db1"), StatementKind::DbDdl);
        assert_eq!(preview("DROP SCHEMA db1"), StatementKind::DbDdl);
        assert_eq!(preview("use db1"), StatementKind::Use);
        assert_eq!(preview("show tables"), StatementKind::Other);
        assert_eq!(preview("set names utf8"), StatementKind::Other);
        assert_eq!(preview(""), StatementKind::Other);
    }

    #[test]
    fn test_preview_skips_comments() {
        assert_eq!(preview("/* hint */ select 1"), StatementKind::Select);
        assert_eq!(preview("-- note\nupdate t set a = 1"), StatementKind::Update);
        assert_eq!(preview("# note\ndelete from t"), StatementKind::Delete);
    }

    #[test]
    fn test_parse_select() {
        let stmt = parse("select a, b from t where a = 1 order by b desc limit 10").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected select");
        };
        assert_eq!(select.exprs.len(), 2);
        assert!(select.where_expr.is_some());
        assert_eq!(select.order_by.len(), 1);
        assert!(select.limit.is_some());
    }

    #[test]
    fn test_parse_select_force_index() {
        let stmt = parse("select a from t force index (ix) where a = 1").unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected select");
        };
        let TableExpr::Aliased(aliased) = &select.from[0] else {
            panic!("expected aliased table");
        };
        let hints = aliased.hints.as_ref().expect("hints");
        assert_eq!(hints.hint_type, "force ");
        assert_eq!(hints.indexes[0].as_str(), "ix");
    }

    #[test]
    fn test_parse_insert_multi_row_on_dup() {
        let stmt = parse(
            "INSERT INTO t(a, b) VALUES (1, 'x'),(2, 'y') ON DUPLICATE KEY UPDATE b = 'z'",
        )
        .unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.action, InsertAction::Insert);
        assert_eq!(insert.columns.len(), 2);
        let InsertRows::Values(rows) = &insert.rows else {
            panic!("expected values");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(insert.on_dup.len(), 1);
    }

    #[test]
    fn test_parse_replace_is_insert_with_replace_action() {
        let stmt = parse("REPLACE INTO t (a) VALUES (1)").unwrap();
        let Statement::Insert(insert) = stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.action, InsertAction::Replace);
    }

    #[test]
    fn test_question_marks_are_numbered_in_order() {
        let stmt = parse("insert into t (a, b, c) values (?, ?, ?)").unwrap();
        let Statement::Insert(mut insert) = stmt else {
            panic!("expected insert");
        };
        let mut seen = Vec::new();
        insert.walk_values_mut(&mut |v| seen.push(v.text.clone()));
        assert_eq!(seen, vec![":v1", ":v2", ":v3"]);
    }

    #[test]
    fn test_parse_update() {
        let stmt = parse("update t set `a` = 1, b = 'x' where c <= 5 and d = 'y'").unwrap();
        let Statement::Update(update) = stmt else {
            panic!("expected update");
        };
        assert_eq!(update.exprs.len(), 2);
        assert!(update.exprs[0].name.name.quoted);
        assert_eq!(update.table_name().unwrap().name.as_str(), "t");
    }

    #[test]
    fn test_parse_delete() {
        let stmt = parse("delete from t where `id` = '239816811'").unwrap();
        assert!(matches!(stmt, Statement::Delete(_)));
    }

    #[test]
    fn test_parse_create_table() {
        let stmt = parse(
            "CREATE TABLE `t` (\n  `id` int(8) unsigned NOT NULL AUTO_INCREMENT,\n  `name` varchar(255) NOT NULL DEFAULT '' COMMENT 'n',\n  PRIMARY KEY (`id`),\n  KEY `ix` (`name`(10))\n) ENGINE=InnoDB AUTO_INCREMENT=493 DEFAULT CHARSET=utf8",
        )
        .unwrap();
        let Statement::Ddl(ddl) = stmt else {
            panic!("expected ddl");
        };
        assert_eq!(ddl.action, DdlAction::Create);
        let spec = ddl.table_spec.as_ref().unwrap();
        assert_eq!(spec.columns.len(), 2);
        assert!(spec.columns[0].typ.autoincrement);
        assert!(spec.columns[0].typ.unsigned);
        assert_eq!(spec.indexes.len(), 2);
        assert!(spec.indexes[0].primary);
        assert_eq!(
            spec.options,
            " engine=innodb auto_increment=493 default charset=utf8"
        );
    }

    #[test]
    fn test_parse_drop_table_if_exists() {
        let stmt = parse("drop table IF EXISTS webcal_live_info").unwrap();
        let Statement::Ddl(ddl) = stmt else {
            panic!("expected ddl");
        };
        assert_eq!(ddl.action, DdlAction::Drop);
        assert!(ddl.if_exists);
    }

    #[test]
    fn test_parse_alter_consumes_body() {
        let stmt =
            parse("alter table `t` add CONSTRAINT `fk` FOREIGN KEY (`a`) REFERENCES `b` (`c`);")
                .unwrap();
        let Statement::Ddl(ddl) = stmt else {
            panic!("expected ddl");
        };
        assert_eq!(ddl.action, DdlAction::Alter);
        assert_eq!(ddl.table.name.as_str(), "t");
    }

    #[test]
    fn test_parse_db_ddl() {
        let stmt = parse("create database db1").unwrap();
        assert!(matches!(stmt, Statement::DbDdl(_)));
        let stmt = parse("drop database if exists db1").unwrap();
        let Statement::DbDdl(db) = stmt else {
            panic!("expected dbddl");
        };
        assert_eq!(db.action, DbDdlAction::Drop);
        assert!(db.if_exists);
    }

    #[test]
    fn test_parse_use() {
        let stmt = parse("use db1").unwrap();
        let Statement::Use(use_stmt) = stmt else {
            panic!("expected use");
        };
        assert_eq!(use_stmt.db_name.as_str(), "db1");
    }

    #[test]
    fn test_parse_error_surfaces() {
        assert!(parse("select from where").is_err());
        assert!(parse("insert into t").is_err());
        assert!(parse("grant all on *.* to x").is_err());
    }
}
