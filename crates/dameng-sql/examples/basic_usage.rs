//! Basic usage examples for dameng-sql.
//!
//! Run with: cargo run --example basic_usage -p dameng-sql

use dameng_sql::{convert, BindValue, CatalogHints, Converter};

fn main() {
    simple_statements();
    upsert_to_merge();
    create_table();
    bound_arguments();
    batch_script();
}

/// Statements that need no catalog knowledge.
fn simple_statements() {
    println!("=== Simple statements ===\n");

    for sql in [
        "select `name` from users where id = 1",
        "use db1",
        "drop table if exists users",
    ] {
        let result = convert(sql).expect("convert");
        println!("{}\n  -> {}\n", sql, result.outputs[0]);
    }
}

/// INSERT ... ON DUPLICATE KEY UPDATE becomes MERGE when the converter
/// knows a unique index covering the inserted columns.
fn upsert_to_merge() {
    println!("=== Upsert to MERGE ===\n");

    let converter = Converter::new(
        CatalogHints::default().with_unique_index("webcal_live_info", "cal_id", ["cal_id"]),
    );
    let result = converter
        .convert(
            "insert into webcal_live_info (cal_id, pullurl) values (634311, 'https://example') \
             on duplicate key update pullurl = 'https://example'",
            &[],
        )
        .expect("convert");
    println!("{}\n", result.outputs[0]);
}

/// CREATE TABLE picks up IDENTITY seeds and DM type spellings; foreign
/// keys come back as follow-up ALTER statements.
fn create_table() {
    println!("=== CREATE TABLE ===\n");

    let sql = "CREATE TABLE `saas_network` (\n  `id` bigint(20) NOT NULL AUTO_INCREMENT,\n  `user_phone` char(16) NOT NULL,\n  PRIMARY KEY (`id`),\n  CONSTRAINT `fk_user` FOREIGN KEY (`user_phone`) REFERENCES `saas_user` (`phone`)\n) ENGINE=InnoDB AUTO_INCREMENT=7;";
    let result = convert(sql).expect("convert");
    println!("{}\n", result.outputs[0]);
    for followup in &result.followups {
        println!("followup: {}\n", followup);
    }
}

/// `?` markers are renumbered to `:vN` and the argument vector is
/// permuted to match, dropping arguments for stripped columns.
fn bound_arguments() {
    println!("=== Bound arguments ===\n");

    let converter =
        Converter::new(CatalogHints::default().with_auto_increment("live_channel", "id"));
    let args: Vec<BindValue> = vec![0i64.into(), 33823i64.into(), "token".into()];
    let result = converter
        .convert(
            "INSERT INTO live_channel (id, channelId, token) VALUES (?, ?, ?)",
            &args,
        )
        .expect("convert");
    println!("{}\nargs: {:?}\n", result.outputs[0], result.args);
}

/// Scripts split on `;` with comment lines skipped.
fn batch_script() {
    println!("=== Batch script ===\n");

    let script = "-- schema setup\nuse db1;\ncreate database reporting;";
    let converter = Converter::default();
    for result in converter.convert_script(script).expect("convert") {
        println!("{}", result.outputs[0]);
    }
}
