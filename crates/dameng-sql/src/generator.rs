//! Target-dialect SQL rendering.
//!
//! The generator walks a [`Statement`] tree and prints DM-acceptable
//! text. Statement keywords are lower-case; DM column options
//! (`PRIMARY KEY`, `NOT NULL`, `IDENTITY`, `DEFAULT`, `COMMENT`, `KEY`)
//! are upper-case. Identifiers that were backtick-quoted in the input
//! are re-emitted with backticks; the converter's final substitution
//! pass turns those into double quotes.
//!
//! Rendering order per node is the same order `walk_values_mut` visits
//! scalar values, which is what keeps renumbered `:vN` placeholders
//! contiguous left to right.

use crate::expressions::*;

/// SQL renderer over a growing string buffer
#[derive(Debug, Default)]
pub struct Generator {
    buf: String,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a statement to SQL text
    pub fn sql(statement: &Statement) -> String {
        let mut generator = Generator::new();
        generator.statement(statement);
        generator.buf
    }

    fn push(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    // -- statements ---------------------------------------------------------

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(s) => self.select(s),
            Statement::Insert(i) => self.insert(i),
            Statement::Update(u) => self.update(u),
            Statement::Delete(d) => self.delete(d),
            Statement::Ddl(d) => self.ddl(d),
            Statement::DbDdl(d) => self.db_ddl(d),
            Statement::Use(u) => {
                self.push("use ");
                self.table_ident(&u.db_name);
            }
            Statement::Merge(m) => self.merge(m),
            Statement::DmDdl(d) => self.dm_ddl(d),
            Statement::DmDbDdl(d) => self.dm_db_ddl(d),
            Statement::DmUse(u) => self.dm_use(u),
        }
    }

    fn comments(&mut self, comments: &[String]) {
        for comment in comments {
            self.push(comment);
            self.push(" ");
        }
    }

    // -- identifiers --------------------------------------------------------

    fn col_ident(&mut self, ident: &ColIdent) {
        if ident.quoted {
            self.push("`");
            self.push(&ident.name);
            self.push("`");
        } else {
            self.push(&ident.name);
        }
    }

    fn table_ident(&mut self, ident: &TableIdent) {
        if ident.quoted {
            self.push("`");
            self.push(&ident.name);
            self.push("`");
        } else {
            self.push(&ident.name);
        }
    }

    fn table_name(&mut self, name: &TableName) {
        if let Some(qualifier) = &name.qualifier {
            self.table_ident(qualifier);
            self.push(".");
        }
        self.table_ident(&name.name);
    }

    fn col_name(&mut self, name: &ColName) {
        if let Some(qualifier) = &name.qualifier {
            self.table_name(qualifier);
            self.push(".");
        }
        self.col_ident(&name.name);
    }

    fn columns(&mut self, columns: &[ColIdent]) {
        self.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.col_ident(column);
        }
        self.push(")");
    }

    // -- expressions --------------------------------------------------------

    fn val(&mut self, val: &SqlVal) {
        match val.kind {
            ValKind::Str => {
                self.push("'");
                self.push(&val.text);
                self.push("'");
            }
            ValKind::Int | ValKind::Float | ValKind::Hex | ValKind::Placeholder => {
                self.push(&val.text)
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Val(v) => self.val(v),
            Expr::Null => self.push("null"),
            Expr::Boolean(true) => self.push("true"),
            Expr::Boolean(false) => self.push("false"),
            Expr::Column(c) => self.col_name(c),
            Expr::Tuple(items) => {
                self.push("(");
                self.expr_list(items);
                self.push(")");
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
            Expr::And(l, r) => {
                self.expr(l);
                self.push(" and ");
                self.expr(r);
            }
            Expr::Or(l, r) => {
                self.expr(l);
                self.push(" or ");
                self.expr(r);
            }
            Expr::Not(inner) => {
                self.push("not ");
                self.expr(inner);
            }
            Expr::Comparison { op, left, right } => {
                self.expr(left);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.expr(right);
            }
            Expr::Binary { op, left, right } => {
                self.expr(left);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.expr(right);
            }
            Expr::In {
                expr,
                list,
                negated,
            } => {
                self.expr(expr);
                self.push(if *negated { " not in " } else { " in " });
                match list.as_ref() {
                    Expr::Tuple(_) | Expr::Subquery(_) => self.expr(list),
                    other => {
                        self.push("(");
                        self.expr(other);
                        self.push(")");
                    }
                }
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.expr(expr);
                self.push(if *negated {
                    " not between "
                } else {
                    " between "
                });
                self.expr(low);
                self.push(" and ");
                self.expr(high);
            }
            Expr::Is { expr, check } => {
                self.expr(expr);
                self.push(match check {
                    IsCheck::Null => " is null",
                    IsCheck::NotNull => " is not null",
                });
            }
            Expr::Like {
                left,
                right,
                negated,
            } => {
                self.expr(left);
                self.push(if *negated { " not like " } else { " like " });
                self.expr(right);
            }
            Expr::UnaryMinus(inner) => {
                self.push("-");
                self.expr(inner);
            }
            Expr::Func(func) => {
                self.push(&func.name);
                self.push("(");
                if func.distinct {
                    self.push("distinct ");
                }
                self.expr_list(&func.args);
                self.push(")");
            }
            Expr::Case(case) => {
                self.push("case ");
                if let Some(operand) = &case.operand {
                    self.expr(operand);
                    self.push(" ");
                }
                for (cond, value) in &case.whens {
                    self.push("when ");
                    self.expr(cond);
                    self.push(" then ");
                    self.expr(value);
                    self.push(" ");
                }
                if let Some(else_expr) = &case.else_expr {
                    self.push("else ");
                    self.expr(else_expr);
                    self.push(" ");
                }
                self.push("end");
            }
            Expr::Exists(select) => {
                self.push("exists (");
                self.select(select);
                self.push(")");
            }
            Expr::Subquery(select) => {
                self.push("(");
                self.select(select);
                self.push(")");
            }
            Expr::Star => self.push("*"),
        }
    }

    fn expr_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(expr);
        }
    }

    // -- SELECT -------------------------------------------------------------

    fn select(&mut self, select: &Select) {
        self.push("select ");
        self.comments(&select.comments);
        if select.distinct {
            self.push("distinct ");
        }
        for (i, expr) in select.exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            match expr {
                SelectExpr::Star => self.push("*"),
                SelectExpr::QualifiedStar(table) => {
                    self.table_name(table);
                    self.push(".*");
                }
                SelectExpr::Expr { expr, alias } => {
                    self.expr(expr);
                    if let Some(alias) = alias {
                        self.push(" as ");
                        self.col_ident(alias);
                    }
                }
            }
        }
        if !select.from.is_empty() {
            self.push(" from ");
            self.table_exprs(&select.from);
        }
        if let Some(where_expr) = &select.where_expr {
            self.push(" where ");
            self.expr(where_expr);
        }
        if !select.group_by.is_empty() {
            self.push(" group by ");
            self.expr_list(&select.group_by);
        }
        if let Some(having) = &select.having {
            self.push(" having ");
            self.expr(having);
        }
        self.order_by(&select.order_by);
        self.limit(&select.limit);
        for union in &select.unions {
            self.push(if union.all { " union all " } else { " union " });
            self.select(&union.select);
        }
    }

    fn table_exprs(&mut self, exprs: &[TableExpr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.table_expr(expr);
        }
    }

    fn table_expr(&mut self, expr: &TableExpr) {
        match expr {
            TableExpr::Aliased(aliased) => {
                match &aliased.expr {
                    SimpleTableExpr::Table(name) => self.table_name(name),
                    SimpleTableExpr::Subquery(select) => {
                        self.push("(");
                        self.select(select);
                        self.push(")");
                    }
                }
                if let Some(alias) = &aliased.alias {
                    self.push(" as ");
                    self.table_ident(alias);
                }
                if let Some(hints) = &aliased.hints {
                    self.push(" ");
                    self.push(&hints.hint_type);
                    self.push("index (");
                    for (i, index) in hints.indexes.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.col_ident(index);
                    }
                    self.push(")");
                }
            }
            TableExpr::Join(join) => {
                self.table_expr(&join.left);
                self.push(" ");
                self.push(join.kind.as_str());
                self.push(" ");
                self.table_expr(&join.right);
                if let Some(on) = &join.on {
                    self.push(" on ");
                    self.expr(on);
                }
            }
        }
    }

    fn order_by(&mut self, orders: &[Order]) {
        if orders.is_empty() {
            return;
        }
        self.push(" order by ");
        for (i, order) in orders.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(&order.expr);
            self.push(" ");
            self.push(order.direction.as_str());
        }
    }

    fn limit(&mut self, limit: &Option<Limit>) {
        let Some(limit) = limit else {
            return;
        };
        self.push(" limit ");
        if let Some(offset) = &limit.offset {
            self.expr(offset);
            self.push(", ");
        }
        self.expr(&limit.count);
    }

    // -- DML ----------------------------------------------------------------

    fn insert(&mut self, insert: &Insert) {
        self.push(insert.action.as_str());
        self.push(" ");
        self.comments(&insert.comments);
        self.push("into ");
        self.table_name(&insert.table);
        if !insert.columns.is_empty() {
            self.columns(&insert.columns);
        }
        self.push(" ");
        match &insert.rows {
            InsertRows::Values(rows) => {
                self.push("values ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push("(");
                    self.expr_list(row);
                    self.push(")");
                }
            }
            InsertRows::Select(select) => self.select(select),
        }
        if !insert.on_dup.is_empty() {
            self.push(" on duplicate key update ");
            self.update_exprs(&insert.on_dup);
        }
    }

    fn update_exprs(&mut self, exprs: &[UpdateExpr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.col_name(&expr.name);
            self.push(" = ");
            self.expr(&expr.expr);
        }
    }

    fn update(&mut self, update: &Update) {
        self.push("update ");
        self.comments(&update.comments);
        self.table_exprs(&update.table_exprs);
        self.push(" set ");
        self.update_exprs(&update.exprs);
        if let Some(where_expr) = &update.where_expr {
            self.push(" where ");
            self.expr(where_expr);
        }
        self.order_by(&update.order_by);
        self.limit(&update.limit);
    }

    fn delete(&mut self, delete: &Delete) {
        self.push("delete ");
        self.comments(&delete.comments);
        self.push("from ");
        self.table_exprs(&delete.table_exprs);
        if let Some(where_expr) = &delete.where_expr {
            self.push(" where ");
            self.expr(where_expr);
        }
        self.order_by(&delete.order_by);
        self.limit(&delete.limit);
    }

    // -- MERGE --------------------------------------------------------------

    fn merge(&mut self, merge: &Merge) {
        self.push("merge ");
        self.comments(&merge.comments);
        self.push("into ");
        self.table_name(&merge.table.target);
        self.push(" ");
        self.table_ident(&merge.table.alias);
        self.push(" using ");
        self.virtual_table(&merge.table.source);
        self.push(" on (");
        self.expr(&merge.table.condition);
        self.push(")");
        if !merge.matched.is_empty() {
            self.push(" when matched then update set ");
            self.update_exprs(&merge.matched);
        }
        self.push(" when not matched then insert ");
        self.columns(&merge.unmatched.columns);
        self.push(" values (");
        for (i, value) in merge.unmatched.values.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.col_name(value);
        }
        self.push(")");
    }

    fn virtual_table(&mut self, table: &VirtualTableExpr) {
        self.push("(");
        for (i, row) in table.rows.iter().enumerate() {
            if i > 0 {
                self.push(" union all ");
            }
            self.push("select ");
            self.expr_list(row);
        }
        self.push(") ");
        self.table_ident(&table.name);
        self.push(" ");
        self.columns(&table.columns);
    }

    // -- DDL ----------------------------------------------------------------

    fn ddl(&mut self, ddl: &Ddl) {
        match ddl.action {
            DdlAction::Create => {
                self.push("create table ");
                self.table_name(&ddl.new_name);
                // source-dialect create bodies are only rendered for
                // debugging; the rewriter always emits DmDdl instead
                if ddl.table_spec.is_some() {
                    self.push(" (...)");
                }
            }
            DdlAction::Drop => {
                self.push("drop table");
                if ddl.if_exists {
                    self.push(" if exists");
                }
                self.push(" ");
                self.table_name(&ddl.table);
            }
            DdlAction::Rename => {
                self.push("rename table ");
                self.table_name(&ddl.table);
                self.push(" to ");
                self.table_name(&ddl.new_name);
            }
            DdlAction::Alter => {
                self.push("alter table ");
                self.table_name(&ddl.table);
            }
            DdlAction::Truncate => {
                self.push("truncate table ");
                self.table_name(&ddl.table);
            }
        }
    }

    fn db_ddl(&mut self, ddl: &DbDdl) {
        match ddl.action {
            DbDdlAction::Create => {
                self.push("create database ");
                self.push(&ddl.name);
            }
            DbDdlAction::Drop => {
                self.push("drop database");
                if ddl.if_exists {
                    self.push(" if exists");
                }
                self.push(" ");
                self.push(&ddl.name);
            }
        }
    }

    fn dm_ddl(&mut self, ddl: &DmDdl) {
        match ddl.action {
            DdlAction::Create => {
                self.push("create table ");
                self.table_name(&ddl.new_name);
                if let Some(spec) = &ddl.table_spec {
                    self.push(" ");
                    self.dm_table_spec(spec);
                }
            }
            DdlAction::Drop => {
                self.push("drop table");
                if ddl.if_exists {
                    self.push(" if exists");
                }
                self.push(" ");
                self.table_name(&ddl.table);
            }
            DdlAction::Rename => {
                self.push("rename table ");
                self.table_name(&ddl.table);
                self.push(" to ");
                self.table_name(&ddl.new_name);
            }
            DdlAction::Alter | DdlAction::Truncate => {
                self.push(ddl.action.as_str());
                self.push(" table ");
                self.table_name(&ddl.table);
            }
        }
    }

    fn dm_table_spec(&mut self, spec: &DmTableSpec) {
        self.push("(\n");
        for (i, column) in spec.columns.iter().enumerate() {
            if i > 0 {
                self.push(",\n");
            }
            self.push("\t");
            self.col_ident(&column.name);
            self.push(" ");
            self.dm_column_type(&column.typ);
        }
        for index in &spec.indexes {
            self.push(",\n\t");
            self.index_definition(index);
        }
        self.push("\n)");
        self.push(&spec.options.replace(", ", ",\n  "));
    }

    fn index_definition(&mut self, index: &IndexDefinition) {
        self.push(&index.type_name);
        if let Some(name) = &index.name {
            self.push(" ");
            self.col_ident(name);
        }
        self.push(" (");
        for (i, col) in index.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.col_ident(&col.column);
            if let Some(length) = &col.length {
                self.push("(");
                self.push(&length.text);
                self.push(")");
            }
        }
        self.push(")");
    }

    /// DM column type: mapped base type, then options in the order
    /// PRIMARY KEY, NOT NULL, IDENTITY, DEFAULT, COMMENT, trailing KEY.
    fn dm_column_type(&mut self, typ: &DmColumnType) {
        match typ.type_name.as_str() {
            "datetime" => self.push("timestamp"),
            "char" => match &typ.length {
                Some(length) => {
                    self.push("char(");
                    self.push(&length.text);
                    self.push(")");
                }
                None => self.push("char"),
            },
            "varchar" => match &typ.length {
                Some(length) => {
                    self.push("varchar(");
                    self.push(&length.text);
                    self.push(" CHAR)");
                }
                None => self.push("varchar"),
            },
            "longtext" | "mediumtext" => self.push("text"),
            other => self.push(other),
        }

        let mut opts: Vec<String> = Vec::new();
        if typ.key_opt == ColumnKeyOption::Primary {
            opts.push("PRIMARY KEY".to_string());
        }
        if typ.not_null {
            opts.push("NOT NULL".to_string());
        }
        if typ.autoincrement
            && matches!(typ.type_name.as_str(), "bigint" | "integer" | "int")
        {
            if typ.seed.is_empty() {
                opts.push("IDENTITY(1,1)".to_string());
            } else {
                opts.push(format!("IDENTITY({},1)", typ.seed));
            }
        }
        if let Some(default) = &typ.default {
            match typ.type_name.as_str() {
                // DM accepts only CURRENT_TIMESTAMP defaults on time columns
                "timestamp" | "datetime" => {
                    if matches!(default, DefaultValue::CurrentTimestamp) {
                        opts.push("DEFAULT CURRENT_TIMESTAMP".to_string());
                    } else {
                        opts.push("DEFAULT NULL".to_string());
                    }
                }
                _ => match default {
                    DefaultValue::Null => opts.push("DEFAULT NULL".to_string()),
                    DefaultValue::CurrentTimestamp => {
                        opts.push("DEFAULT CURRENT_TIMESTAMP".to_string())
                    }
                    DefaultValue::Literal(val) => {
                        if matches!(typ.type_name.as_str(), "char" | "varchar") {
                            opts.push(format!("DEFAULT '{}'", val.text));
                        } else {
                            opts.push(format!("DEFAULT {}", val.text));
                        }
                    }
                },
            }
        }
        if let Some(comment) = &typ.comment {
            opts.push(format!("COMMENT '{}'", comment.text));
        }
        if typ.key_opt == ColumnKeyOption::Key {
            opts.push("KEY".to_string());
        }

        if !opts.is_empty() {
            self.push(" ");
            self.push(&opts.join(" "));
        }
    }

    fn dm_db_ddl(&mut self, ddl: &DmDbDdl) {
        match ddl.action {
            DbDdlAction::Create => {
                self.push("create schema ");
                self.push(&ddl.name);
            }
            DbDdlAction::Drop => {
                self.push("drop schema");
                if ddl.if_exists {
                    self.push(" if exists");
                }
                self.push(" ");
                self.push(&ddl.name);
            }
        }
    }

    fn dm_use(&mut self, use_stmt: &DmUse) {
        if !use_stmt.db_name.is_empty() {
            self.push("set schema ");
            self.table_ident(&use_stmt.db_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(sql: &str) -> String {
        Generator::sql(&parse(sql).expect("parse failed"))
    }

    #[test]
    fn test_select_roundtrip() {
        assert_eq!(
            roundtrip("select a, b from t where a = 1 order by b desc limit 10"),
            "select a, b from t where a = 1 order by b desc limit 10"
        );
    }

    #[test]
    fn test_quoted_identifiers_keep_backticks() {
        assert_eq!(
            roundtrip("update meet_stop_job set `mark` = 'x' where stopTime <= 1689177600"),
            "update meet_stop_job set `mark` = 'x' where stopTime <= 1689177600"
        );
    }

    #[test]
    fn test_insert_roundtrip() {
        assert_eq!(
            roundtrip("insert into t(a, b) values (1, 'x'), (2, 'y')"),
            "insert into t(a, b) values (1, 'x'), (2, 'y')"
        );
    }

    #[test]
    fn test_join_roundtrip() {
        assert_eq!(
            roundtrip("select u.id from users as u left join orders as o on u.id = o.user_id"),
            "select u.id from users as u left join orders as o on u.id = o.user_id"
        );
    }

    #[test]
    fn test_index_hint_keeps_trailing_space_type() {
        assert_eq!(
            roundtrip("select a from t force index (ix)"),
            "select a from t force index (ix)"
        );
    }

    #[test]
    fn test_use_renders_set_schema_via_dm_use() {
        let stmt = Statement::DmUse(Box::new(DmUse {
            db_name: TableIdent::new("db1"),
        }));
        assert_eq!(Generator::sql(&stmt), "set schema db1");
    }

    #[test]
    fn test_empty_schema_name_renders_nothing() {
        let stmt = Statement::DmUse(Box::new(DmUse {
            db_name: TableIdent::new(""),
        }));
        assert_eq!(Generator::sql(&stmt), "");
    }

    #[test]
    fn test_case_expression() {
        assert_eq!(
            roundtrip("select case when a = 1 then 'one' else 'many' end from t"),
            "select case when a = 1 then 'one' else 'many' end from t"
        );
    }

    #[test]
    fn test_union_roundtrip() {
        assert_eq!(
            roundtrip("select a from t union all select a from u"),
            "select a from t union all select a from u"
        );
    }
}
