//! DML conversion tests: pass-through, quoting, increment stripping,
//! and the INSERT → MERGE upgrade.

use dameng_sql::{convert, CatalogHints, Converter};

fn converter() -> Converter {
    Converter::new(
        CatalogHints::default()
            .with_unique_index("notice_status_new", "indexs", ["conversation", "user_id"])
            .with_unique_index("conf_infos", "uq_conf", ["conferenceId", "eventId"])
            .with_auto_increment("notice_status_new", "id")
            .with_auto_increment("live_channel", "id"),
    )
}

// ============================================================================
// Pass-through
// ============================================================================

#[test]
fn test_unsupported_kind_returns_input_verbatim() {
    for sql in ["show tables", "set names utf8", "begin", "commit", "explain select 1"] {
        let result = convert(sql).expect("convert");
        assert!(result.followups.is_empty());
        assert_eq!(result.outputs, vec![sql.to_string()]);
        assert!(result.args.is_empty());
    }
}

#[test]
fn test_unsupported_kind_keeps_args() {
    let args = vec![1i64.into(), "x".into()];
    let result = converter().convert("show tables", &args).expect("convert");
    assert_eq!(result.args, args);
}

#[test]
fn test_parse_error_surfaces() {
    assert!(convert("select from where").is_err());
}

// ============================================================================
// SELECT
// ============================================================================

#[test]
fn test_select_round_trip_with_quoting() {
    let result = converter()
        .convert(
            "select cal_id, creator from conf_summary where `type` = 4 and cal_id = 635427",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "select cal_id, creator from conf_summary where \"type\" = 4 and cal_id = 635427"
                .to_string()
        ]
    );
}

#[test]
fn test_select_force_index_hint_removed() {
    let result = converter()
        .convert("select a from t force index (ix) where a = 1", &[])
        .expect("convert");
    assert_eq!(result.outputs, vec!["select a from t where a = 1".to_string()]);
}

// ============================================================================
// INSERT
// ============================================================================

#[test]
fn test_insert_increment_column_stripped() {
    let result = converter()
        .convert(
            "INSERT INTO `live_channel` (`id`, `channelId`, `token`) VALUES (0, 33823, '3beb2b05cd7b960025dcc49d1e135ff4')",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "insert into \"live_channel\"(\"channelId\", \"token\") values (33823, '3beb2b05cd7b960025dcc49d1e135ff4')"
                .to_string()
        ]
    );
}

#[test]
fn test_plain_insert_without_unique_index_stays_insert() {
    let result = converter()
        .convert(
            "insert into unknown_table (a, b) values (1, 2) on duplicate key update b = 3",
            &[],
        )
        .expect("convert");
    assert!(result.outputs[0].starts_with("insert"));
    assert!(!result.outputs[0].contains("on duplicate"));
}

#[test]
fn test_insert_on_dup_becomes_merge() {
    let sql = "INSERT INTO notice_status_new(id, chat_id, chat_type, conversation, user_id, count, push_count, sys_count, sender_seq, ackread_seq, created, valid) VALUES (NULL, 105, 5, 157, 88897133, 0, 0, 0, 0, 1693815665867, 1693815665868, 1),(NULL, 105, 5, 157, 88897136, 0, 0, 0, 0, 1693815665867, 1693815665868, 1) ON DUPLICATE KEY UPDATE valid = 1";
    let result = converter().convert(sql, &[]).expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "merge into notice_status_new t using (select 105, 5, 157, 88897133, 0, 0, 0, 0, 1693815665867, 1693815665868, 1 union all select 105, 5, 157, 88897136, 0, 0, 0, 0, 1693815665867, 1693815665868, 1) s (chat_id, chat_type, conversation, user_id, count, push_count, sys_count, sender_seq, ackread_seq, created, valid) on (t.conversation = s.conversation and t.user_id = s.user_id) when matched then update set t.valid = 1 when not matched then insert (chat_id, chat_type, conversation, user_id, count, push_count, sys_count, sender_seq, ackread_seq, created, valid) values (s.chat_id, s.chat_type, s.conversation, s.user_id, s.count, s.push_count, s.sys_count, s.sender_seq, s.ackread_seq, s.created, s.valid)"
                .to_string()
        ]
    );
}

#[test]
fn test_single_condition_column_collapses_to_one_comparison() {
    let hints = CatalogHints::default().with_unique_index("webcal_live_info", "cal_id", ["cal_id"]);
    let result = Converter::new(hints)
        .convert(
            "insert into webcal_live_info (cal_id, pullurl) values (634311, 'u') on duplicate key update pullurl = 'u'",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "merge into webcal_live_info t using (select 634311, 'u') s (cal_id, pullurl) on (t.cal_id = s.cal_id) when matched then update set t.pullurl = 'u' when not matched then insert (cal_id, pullurl) values (s.cal_id, s.pullurl)"
                .to_string()
        ]
    );
}

#[test]
fn test_replace_with_covering_index_becomes_merge() {
    let hints = CatalogHints::default().with_unique_index("exchange_bindinfo", "uq", ["userId"]);
    let result = Converter::new(hints)
        .convert(
            "REPLACE INTO exchange_bindinfo (userId, resId, bindingData) values (1, 'abcd', '101003')",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "merge into exchange_bindinfo t using (select 1, 'abcd', '101003') s (userId, resId, bindingData) on (t.userId = s.userId) when matched then update set t.resId = 'abcd', t.bindingData = '101003' when not matched then insert (userId, resId, bindingData) values (s.userId, s.resId, s.bindingData)"
                .to_string()
        ]
    );
}

#[test]
fn test_replace_without_covering_index_renders_replace() {
    let result = convert("replace into t (a) values (1)").expect("convert");
    assert_eq!(result.outputs, vec!["replace into t(a) values (1)".to_string()]);
}

#[test]
fn test_insert_without_columns_and_on_dup_kept_as_is() {
    let result = convert("insert into t values (1) on duplicate key update a = 2").expect("convert");
    assert_eq!(
        result.outputs,
        vec!["insert into t values (1) on duplicate key update a = 2".to_string()]
    );
}

// ============================================================================
// UPDATE / DELETE
// ============================================================================

#[test]
fn test_update_round_trip_with_quoting() {
    let result = converter()
        .convert(
            "update meet_stop_job set `mark` = '172.10.157.179', `updateTime` = '2023-07-13 00:00:00' where stopTime <= 1689177600 and serverUrl = 'http://uniform.quanshi.com'",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec![
            "update meet_stop_job set \"mark\" = '172.10.157.179', \"updateTime\" = '2023-07-13 00:00:00' where stopTime <= 1689177600 and serverUrl = 'http://uniform.quanshi.com'"
                .to_string()
        ]
    );
}

#[test]
fn test_update_increment_assignment_dropped() {
    let result = converter()
        .convert("update notice_status_new set id = 9, valid = 0 where valid = 1", &[])
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec!["update notice_status_new set valid = 0 where valid = 1".to_string()]
    );
}

#[test]
fn test_delete_round_trip_with_quoting() {
    let result = converter()
        .convert(
            "delete from meet_conference_extrainfo where `conferenceId` = '239816811'",
            &[],
        )
        .expect("convert");
    assert_eq!(
        result.outputs,
        vec!["delete from meet_conference_extrainfo where \"conferenceId\" = '239816811'".to_string()]
    );
}

// ============================================================================
// USE / substitutions
// ============================================================================

#[test]
fn test_use_becomes_set_schema() {
    let result = convert("use db1").expect("convert");
    assert_eq!(result.outputs, vec!["set schema db1".to_string()]);
}

#[test]
fn test_zero_date_sentinel_replaced() {
    let result = convert("insert into t (a) values ('0000-00-00 00:00:00')").expect("convert");
    assert_eq!(
        result.outputs,
        vec!["insert into t(a) values ('0001-01-01 00:00:00')".to_string()]
    );
}

#[test]
fn test_escaped_quote_doubled() {
    let result = convert(r"insert into t (a) values ('it\'s')").expect("convert");
    assert_eq!(result.outputs, vec!["insert into t(a) values ('it''s')".to_string()]);
}

#[test]
fn test_outputs_never_contain_backticks_or_sentinels() {
    let statements = [
        "select `a` from `t` where `b` = '0000-00-00 00:00:00'",
        "update `t` set `a` = 'x\\'y'",
        "delete from `t` where `a` = 1",
        "use `db1`",
    ];
    for sql in statements {
        let result = convert(sql).expect("convert");
        let out = &result.outputs[0];
        assert!(!out.contains('`'), "backtick in: {}", out);
        assert!(!out.contains("0000-00-00 00:00:00"), "sentinel in: {}", out);
        assert!(!out.contains("\\'"), "escaped quote in: {}", out);
    }
}

#[test]
fn test_outputs_has_exactly_one_element_on_success() {
    for sql in [
        "select 1",
        "insert into t (a) values (1)",
        "update t set a = 1",
        "delete from t",
        "use db1",
        "show tables",
    ] {
        let result = convert(sql).expect("convert");
        assert_eq!(result.outputs.len(), 1, "for {}", sql);
    }
}

// ============================================================================
// Batch helper
// ============================================================================

#[test]
fn test_convert_script() {
    let script = "-- dump header\nuse db1;\nselect 1;";
    let results = converter().convert_script(script).expect("convert");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].outputs, vec!["set schema db1".to_string()]);
    assert_eq!(results[1].outputs, vec!["select 1".to_string()]);
}
