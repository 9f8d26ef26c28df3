use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dameng_sql::{CatalogHints, Converter};

const SIMPLE_SELECT: &str = "SELECT a, b, c FROM table1 WHERE a = 1";

const UPSERT: &str = "INSERT INTO notice_status_new(chat_id, chat_type, conversation, user_id, valid) VALUES (105, 5, 157, 88897133, 1),(105, 5, 157, 88897136, 1) ON DUPLICATE KEY UPDATE valid = 1";

const CREATE_TABLE: &str = "CREATE TABLE `bi_input_group` (\n  `bkid` bigint(20) NOT NULL AUTO_INCREMENT,\n  `code` varchar(200) DEFAULT NULL,\n  `edittime` timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP,\n  PRIMARY KEY (`bkid`)\n) ENGINE=InnoDB AUTO_INCREMENT=9 DEFAULT CHARSET=utf8mb4;";

fn bench_convert(c: &mut Criterion) {
    let converter = Converter::new(
        CatalogHints::default()
            .with_unique_index("notice_status_new", "indexs", ["conversation", "user_id"])
            .with_auto_increment("notice_status_new", "id"),
    );

    let mut group = c.benchmark_group("convert");
    for (name, sql) in [
        ("select", SIMPLE_SELECT),
        ("upsert_to_merge", UPSERT),
        ("create_table", CREATE_TABLE),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), sql, |b, sql| {
            b.iter(|| converter.convert(black_box(sql), &[]).expect("convert"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
