//! SQL statement AST.
//!
//! The central type is [`Statement`], a tagged enum with one arm per
//! statement kind. Source arms (`Select`, `Insert`, `Update`, `Delete`,
//! `Ddl`, `DbDdl`, `Use`) are produced by the parser; target-only arms
//! (`Merge`, `DmDdl`, `DmDbDdl`, `DmUse`) are produced by the rewriter
//! and only ever rendered.
//!
//! Identifiers remember whether the input quoted them, so the generator
//! can re-emit backticks (later substituted to double quotes) only where
//! the caller wrote them.
//!
//! Traversal is deliberately narrow: the translation engine needs a
//! deterministic walk over scalar values in *render order* (for the
//! parameter re-binder) and a walk over column names (for merge
//! qualification). Both are total per-kind methods rather than a
//! reflective visitor.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers and names
// ---------------------------------------------------------------------------

/// A column-level identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColIdent {
    pub name: String,
    /// True when the input spelled the identifier with backticks
    #[serde(default)]
    pub quoted: bool,
}

impl ColIdent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// A table-level identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdent {
    pub name: String,
    #[serde(default)]
    pub quoted: bool,
}

impl TableIdent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: false,
        }
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoted: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// A possibly database-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableName {
    pub qualifier: Option<TableIdent>,
    pub name: TableIdent,
}

impl TableName {
    pub fn new(name: TableIdent) -> Self {
        Self {
            qualifier: None,
            name,
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(TableIdent::new(name))
    }
}

/// A possibly table-qualified column name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColName {
    pub qualifier: Option<TableName>,
    pub name: ColIdent,
}

impl ColName {
    pub fn bare(name: ColIdent) -> Self {
        Self {
            qualifier: None,
            name,
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: ColIdent) -> Self {
        Self {
            qualifier: Some(TableName::bare(qualifier)),
            name,
        }
    }
}

// ---------------------------------------------------------------------------
// Scalar values and expressions
// ---------------------------------------------------------------------------

/// Kind of a scalar literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValKind {
    /// Quoted string; `text` holds the raw inner bytes as written
    Str,
    Int,
    Float,
    Hex,
    /// Bind marker; `text` is `:vN` or `:name`
    Placeholder,
}

/// A scalar literal or bind marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlVal {
    pub kind: ValKind,
    pub text: String,
}

impl SqlVal {
    pub fn new(kind: ValKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn int(text: impl Into<String>) -> Self {
        Self::new(ValKind::Int, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ValKind::Str, text)
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(ValKind::Placeholder, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    NullSafeEq,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::NullSafeEq => "<=>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsCheck {
    Null,
    NotNull,
}

/// A function call, e.g. `count(*)` or `values(col)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncExpr {
    pub name: String,
    pub distinct: bool,
    pub args: Vec<Expr>,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseExpr {
    pub operand: Option<Expr>,
    pub whens: Vec<(Expr, Expr)>,
    pub else_expr: Option<Expr>,
}

/// A scalar expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Val(SqlVal),
    Null,
    Boolean(bool),
    Column(ColName),
    Tuple(Vec<Expr>),
    Paren(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    In {
        expr: Box<Expr>,
        list: Box<Expr>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    Is {
        expr: Box<Expr>,
        check: IsCheck,
    },
    Like {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
    UnaryMinus(Box<Expr>),
    Func(Box<FuncExpr>),
    Case(Box<CaseExpr>),
    Exists(Box<Select>),
    Subquery(Box<Select>),
    /// `*` as a function argument, e.g. `count(*)`
    Star,
}

impl Expr {
    pub fn column(name: ColIdent) -> Self {
        Expr::Column(ColName::bare(name))
    }

    pub fn equals(left: Expr, right: Expr) -> Self {
        Expr::Comparison {
            op: CompareOp::Eq,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Visit every scalar value in this expression, in render order.
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        match self {
            Expr::Val(v) => f(v),
            Expr::Null | Expr::Boolean(_) | Expr::Column(_) | Expr::Star => {}
            Expr::Tuple(items) => {
                for item in items {
                    item.walk_values_mut(f);
                }
            }
            Expr::Paren(inner) | Expr::Not(inner) | Expr::UnaryMinus(inner) => {
                inner.walk_values_mut(f)
            }
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.walk_values_mut(f);
                r.walk_values_mut(f);
            }
            Expr::Comparison { left, right, .. } | Expr::Binary { left, right, .. } => {
                left.walk_values_mut(f);
                right.walk_values_mut(f);
            }
            Expr::In { expr, list, .. } => {
                expr.walk_values_mut(f);
                list.walk_values_mut(f);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.walk_values_mut(f);
                low.walk_values_mut(f);
                high.walk_values_mut(f);
            }
            Expr::Is { expr, .. } => expr.walk_values_mut(f),
            Expr::Like { left, right, .. } => {
                left.walk_values_mut(f);
                right.walk_values_mut(f);
            }
            Expr::Func(func) => {
                for arg in &mut func.args {
                    arg.walk_values_mut(f);
                }
            }
            Expr::Case(case) => {
                if let Some(op) = &mut case.operand {
                    op.walk_values_mut(f);
                }
                for (cond, val) in &mut case.whens {
                    cond.walk_values_mut(f);
                    val.walk_values_mut(f);
                }
                if let Some(e) = &mut case.else_expr {
                    e.walk_values_mut(f);
                }
            }
            Expr::Exists(sel) | Expr::Subquery(sel) => sel.walk_values_mut(f),
        }
    }

    /// Visit every column name in this expression, in render order.
    pub fn walk_columns_mut<F: FnMut(&mut ColName)>(&mut self, f: &mut F) {
        match self {
            Expr::Column(col) => f(col),
            Expr::Val(_) | Expr::Null | Expr::Boolean(_) | Expr::Star => {}
            Expr::Tuple(items) => {
                for item in items {
                    item.walk_columns_mut(f);
                }
            }
            Expr::Paren(inner) | Expr::Not(inner) | Expr::UnaryMinus(inner) => {
                inner.walk_columns_mut(f)
            }
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.walk_columns_mut(f);
                r.walk_columns_mut(f);
            }
            Expr::Comparison { left, right, .. } | Expr::Binary { left, right, .. } => {
                left.walk_columns_mut(f);
                right.walk_columns_mut(f);
            }
            Expr::In { expr, list, .. } => {
                expr.walk_columns_mut(f);
                list.walk_columns_mut(f);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.walk_columns_mut(f);
                low.walk_columns_mut(f);
                high.walk_columns_mut(f);
            }
            Expr::Is { expr, .. } => expr.walk_columns_mut(f),
            Expr::Like { left, right, .. } => {
                left.walk_columns_mut(f);
                right.walk_columns_mut(f);
            }
            Expr::Func(func) => {
                for arg in &mut func.args {
                    arg.walk_columns_mut(f);
                }
            }
            Expr::Case(case) => {
                if let Some(op) = &mut case.operand {
                    op.walk_columns_mut(f);
                }
                for (cond, val) in &mut case.whens {
                    cond.walk_columns_mut(f);
                    val.walk_columns_mut(f);
                }
                if let Some(e) = &mut case.else_expr {
                    e.walk_columns_mut(f);
                }
            }
            // column references inside a subquery resolve in their own scope
            Expr::Exists(_) | Expr::Subquery(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectExpr {
    Star,
    QualifiedStar(TableName),
    Expr {
        expr: Expr,
        alias: Option<ColIdent>,
    },
}

/// `USE | IGNORE | FORCE INDEX (...)`. The hint type keeps a trailing
/// space (`"force "`), matching how the classifying parser marks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHints {
    pub hint_type: String,
    pub indexes: Vec<ColIdent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleTableExpr {
    Table(TableName),
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasedTableExpr {
    pub expr: SimpleTableExpr,
    pub alias: Option<TableIdent>,
    pub hints: Option<IndexHints>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Join,
    LeftJoin,
    RightJoin,
    CrossJoin,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Join => "join",
            JoinKind::LeftJoin => "left join",
            JoinKind::RightJoin => "right join",
            JoinKind::CrossJoin => "cross join",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTableExpr {
    pub left: TableExpr,
    pub kind: JoinKind,
    pub right: TableExpr,
    pub on: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableExpr {
    Aliased(AliasedTableExpr),
    Join(Box<JoinTableExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub expr: Expr,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub offset: Option<Expr>,
    pub count: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Union {
    pub all: bool,
    pub select: Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Select {
    pub comments: Vec<String>,
    pub distinct: bool,
    pub exprs: Vec<SelectExpr>,
    pub from: Vec<TableExpr>,
    pub where_expr: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<Order>,
    pub limit: Option<Limit>,
    pub unions: Vec<Union>,
}

impl Select {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        for expr in &mut self.exprs {
            if let SelectExpr::Expr { expr, .. } = expr {
                expr.walk_values_mut(f);
            }
        }
        for table in &mut self.from {
            table.walk_values_mut(f);
        }
        if let Some(w) = &mut self.where_expr {
            w.walk_values_mut(f);
        }
        for g in &mut self.group_by {
            g.walk_values_mut(f);
        }
        if let Some(h) = &mut self.having {
            h.walk_values_mut(f);
        }
        for o in &mut self.order_by {
            o.expr.walk_values_mut(f);
        }
        if let Some(l) = &mut self.limit {
            if let Some(off) = &mut l.offset {
                off.walk_values_mut(f);
            }
            l.count.walk_values_mut(f);
        }
        for u in &mut self.unions {
            u.select.walk_values_mut(f);
        }
    }
}

impl TableExpr {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        match self {
            TableExpr::Aliased(aliased) => {
                if let SimpleTableExpr::Subquery(sel) = &mut aliased.expr {
                    sel.walk_values_mut(f);
                }
            }
            TableExpr::Join(join) => {
                join.left.walk_values_mut(f);
                join.right.walk_values_mut(f);
                if let Some(on) = &mut join.on {
                    on.walk_values_mut(f);
                }
            }
        }
    }

    /// The first plain table name reachable from this expression.
    pub fn first_table_name(&self) -> Option<&TableName> {
        match self {
            TableExpr::Aliased(aliased) => match &aliased.expr {
                SimpleTableExpr::Table(name) => Some(name),
                SimpleTableExpr::Subquery(_) => None,
            },
            TableExpr::Join(join) => join
                .left
                .first_table_name()
                .or_else(|| join.right.first_table_name()),
        }
    }
}

// ---------------------------------------------------------------------------
// DML
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertAction {
    Insert,
    Replace,
}

impl InsertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertAction::Insert => "insert",
            InsertAction::Replace => "replace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertRows {
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
}

/// A single `col = expr` assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExpr {
    pub name: ColName,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insert {
    pub action: InsertAction,
    pub comments: Vec<String>,
    pub table: TableName,
    pub columns: Vec<ColIdent>,
    pub rows: InsertRows,
    pub on_dup: Vec<UpdateExpr>,
}

impl Insert {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        match &mut self.rows {
            InsertRows::Values(rows) => {
                for row in rows {
                    for value in row {
                        value.walk_values_mut(f);
                    }
                }
            }
            InsertRows::Select(sel) => sel.walk_values_mut(f),
        }
        for expr in &mut self.on_dup {
            expr.expr.walk_values_mut(f);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub comments: Vec<String>,
    pub table_exprs: Vec<TableExpr>,
    pub exprs: Vec<UpdateExpr>,
    pub where_expr: Option<Expr>,
    pub order_by: Vec<Order>,
    pub limit: Option<Limit>,
}

impl Update {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        for expr in &mut self.exprs {
            expr.expr.walk_values_mut(f);
        }
        if let Some(w) = &mut self.where_expr {
            w.walk_values_mut(f);
        }
        for o in &mut self.order_by {
            o.expr.walk_values_mut(f);
        }
        if let Some(l) = &mut self.limit {
            if let Some(off) = &mut l.offset {
                off.walk_values_mut(f);
            }
            l.count.walk_values_mut(f);
        }
    }

    /// The target table, extracted from the first plain table reference.
    pub fn table_name(&self) -> Option<&TableName> {
        self.table_exprs.iter().find_map(|t| t.first_table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delete {
    pub comments: Vec<String>,
    pub table_exprs: Vec<TableExpr>,
    pub where_expr: Option<Expr>,
    pub order_by: Vec<Order>,
    pub limit: Option<Limit>,
}

impl Delete {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        if let Some(w) = &mut self.where_expr {
            w.walk_values_mut(f);
        }
        for o in &mut self.order_by {
            o.expr.walk_values_mut(f);
        }
        if let Some(l) = &mut self.limit {
            if let Some(off) = &mut l.offset {
                off.walk_values_mut(f);
            }
            l.count.walk_values_mut(f);
        }
    }
}

// ---------------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DdlAction {
    Create,
    Alter,
    Drop,
    Rename,
    Truncate,
}

impl DdlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DdlAction::Create => "create",
            DdlAction::Alter => "alter",
            DdlAction::Drop => "drop",
            DdlAction::Rename => "rename",
            DdlAction::Truncate => "truncate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Literal(SqlVal),
    Null,
    CurrentTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKeyOption {
    None,
    Primary,
    Unique,
    UniqueKey,
    Key,
}

/// A MySQL column type with its generic, numeric, and text options.
/// Unsigned/zerofill/charset/collate are preserved from the input but
/// generally suppressed on DM output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    /// Lowercased base type name
    pub type_name: String,
    pub length: Option<SqlVal>,
    pub scale: Option<SqlVal>,
    pub unsigned: bool,
    pub zerofill: bool,
    pub not_null: bool,
    pub autoincrement: bool,
    pub default: Option<DefaultValue>,
    /// `ON UPDATE CURRENT_TIMESTAMP` seen
    pub on_update: bool,
    pub comment: Option<SqlVal>,
    pub charset: String,
    pub collate: String,
    pub enum_values: Vec<String>,
    pub key_opt: ColumnKeyOption,
}

impl ColumnType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            length: None,
            scale: None,
            unsigned: false,
            zerofill: false,
            not_null: false,
            autoincrement: false,
            default: None,
            on_update: false,
            comment: None,
            charset: String::new(),
            collate: String::new(),
            enum_values: Vec::new(),
            key_opt: ColumnKeyOption::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: ColIdent,
    pub typ: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub column: ColIdent,
    pub length: Option<SqlVal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub primary: bool,
    /// Rendered keyword, e.g. `primary key`, `unique key`, `key`
    pub type_name: String,
    pub name: Option<ColIdent>,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
    /// Raw table options, lowercased, with a leading space when present
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ddl {
    pub action: DdlAction,
    pub table: TableName,
    pub new_name: TableName,
    pub if_exists: bool,
    pub table_spec: Option<TableSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbDdlAction {
    Create,
    Drop,
}

impl DbDdlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbDdlAction::Create => "create",
            DbDdlAction::Drop => "drop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbDdl {
    pub action: DbDdlAction,
    pub name: String,
    pub if_exists: bool,
    pub if_not_exists: bool,
    pub charset: String,
    pub collate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Use {
    pub db_name: TableIdent,
}

// ---------------------------------------------------------------------------
// Target-only nodes
// ---------------------------------------------------------------------------

/// `MERGE INTO <target> t USING (<rows>) s (<cols>) ON (<condition>)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeTableExpr {
    pub target: TableName,
    pub alias: TableIdent,
    pub source: VirtualTableExpr,
    pub condition: Expr,
}

/// The parenthesized `select ... union all select ...` carrying literal row
/// data on the right side of a MERGE USING clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualTableExpr {
    pub rows: Vec<Vec<Expr>>,
    pub name: TableIdent,
    pub columns: Vec<ColIdent>,
}

/// The `WHEN NOT MATCHED THEN INSERT` branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedExpr {
    pub columns: Vec<ColIdent>,
    pub values: Vec<ColName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    pub comments: Vec<String>,
    pub table: MergeTableExpr,
    pub matched: Vec<UpdateExpr>,
    pub unmatched: UnmatchedExpr,
}

impl Merge {
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        for row in &mut self.table.source.rows {
            for value in row {
                value.walk_values_mut(f);
            }
        }
        self.table.condition.walk_values_mut(f);
        for expr in &mut self.matched {
            expr.expr.walk_values_mut(f);
        }
    }
}

/// DM column type. Mirrors [`ColumnType`] plus the `AUTO_INCREMENT=n`
/// seed lifted from the source table options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmColumnType {
    pub type_name: String,
    pub length: Option<SqlVal>,
    pub scale: Option<SqlVal>,
    pub unsigned: bool,
    pub zerofill: bool,
    pub not_null: bool,
    pub autoincrement: bool,
    /// Identity seed digits, empty when the source carried none
    pub seed: String,
    pub default: Option<DefaultValue>,
    pub comment: Option<SqlVal>,
    pub key_opt: ColumnKeyOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmColumnDefinition {
    pub name: ColIdent,
    pub typ: DmColumnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmTableSpec {
    pub columns: Vec<DmColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDdl {
    pub action: DdlAction,
    pub table: TableName,
    pub new_name: TableName,
    pub if_exists: bool,
    pub table_spec: Option<DmTableSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDbDdl {
    pub action: DbDdlAction,
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmUse {
    pub db_name: TableIdent,
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// A parsed or rewritten SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Select(Box<Select>),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
    Ddl(Box<Ddl>),
    DbDdl(Box<DbDdl>),
    Use(Box<Use>),
    Merge(Box<Merge>),
    DmDdl(Box<DmDdl>),
    DmDbDdl(Box<DmDbDdl>),
    DmUse(Box<DmUse>),
}

impl Statement {
    /// Visit every scalar value in the statement, in the order the
    /// generator renders them. The parameter re-binder relies on this
    /// ordering being identical to the rendered placeholder order.
    pub fn walk_values_mut<F: FnMut(&mut SqlVal)>(&mut self, f: &mut F) {
        match self {
            Statement::Select(s) => s.walk_values_mut(f),
            Statement::Insert(i) => i.walk_values_mut(f),
            Statement::Update(u) => u.walk_values_mut(f),
            Statement::Delete(d) => d.walk_values_mut(f),
            Statement::Merge(m) => m.walk_values_mut(f),
            Statement::Ddl(_)
            | Statement::DbDdl(_)
            | Statement::Use(_)
            | Statement::DmDdl(_)
            | Statement::DmDbDdl(_)
            | Statement::DmUse(_) => {}
        }
    }
}

/// Qualify every bare column in the given assignments with the alias,
/// left-hand sides included.
pub fn qualify_bare_columns(exprs: &mut [UpdateExpr], alias: &str) {
    let mut qualify = |col: &mut ColName| {
        if col.qualifier.is_none() {
            col.qualifier = Some(TableName::bare(alias));
        }
    };
    for expr in exprs {
        qualify(&mut expr.name);
        expr.expr.walk_columns_mut(&mut qualify);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_row(texts: &[&str]) -> Vec<Expr> {
        texts
            .iter()
            .map(|t| Expr::Val(SqlVal::placeholder(*t)))
            .collect()
    }

    #[test]
    fn test_insert_walk_order_rows_then_on_dup() {
        let mut insert = Insert {
            action: InsertAction::Insert,
            comments: vec![],
            table: TableName::bare("t"),
            columns: vec![ColIdent::new("a"), ColIdent::new("b")],
            rows: InsertRows::Values(vec![
                placeholder_row(&[":v1", ":v2"]),
                placeholder_row(&[":v3", ":v4"]),
            ]),
            on_dup: vec![UpdateExpr {
                name: ColName::bare(ColIdent::new("b")),
                expr: Expr::Val(SqlVal::placeholder(":v5")),
            }],
        };
        let mut seen = Vec::new();
        insert.walk_values_mut(&mut |v| seen.push(v.text.clone()));
        assert_eq!(seen, vec![":v1", ":v2", ":v3", ":v4", ":v5"]);
    }

    #[test]
    fn test_qualify_bare_columns_skips_qualified() {
        let mut exprs = vec![
            UpdateExpr {
                name: ColName::bare(ColIdent::new("a")),
                expr: Expr::column(ColIdent::new("b")),
            },
            UpdateExpr {
                name: ColName::qualified("x", ColIdent::new("c")),
                expr: Expr::Val(SqlVal::int("1")),
            },
        ];
        qualify_bare_columns(&mut exprs, "t");
        assert_eq!(
            exprs[0].name.qualifier.as_ref().unwrap().name.as_str(),
            "t"
        );
        if let Expr::Column(col) = &exprs[0].expr {
            assert_eq!(col.qualifier.as_ref().unwrap().name.as_str(), "t");
        } else {
            panic!("expected column");
        }
        assert_eq!(
            exprs[1].name.qualifier.as_ref().unwrap().name.as_str(),
            "x"
        );
    }

    #[test]
    fn test_update_table_name() {
        let update = Update {
            comments: vec![],
            table_exprs: vec![TableExpr::Aliased(AliasedTableExpr {
                expr: SimpleTableExpr::Table(TableName::bare("meet_stop_job")),
                alias: None,
                hints: None,
            })],
            exprs: vec![],
            where_expr: None,
            order_by: vec![],
            limit: None,
        };
        assert_eq!(update.table_name().unwrap().name.as_str(), "meet_stop_job");
    }
}
