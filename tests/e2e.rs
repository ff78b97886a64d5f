//! End-to-end scenarios against a real server, gated behind `DATABASE_URL`
//! (same idiom as `sqlx-mysql`'s own `tests/connection.rs`): unset, these
//! fail fast with a clear error rather than silently skipping.

use std::env;

use mysql_native::{MySqlConnectOptions, MySqlConnection, MySqlIsolationLevel, MySqlOutType};

type TestResult = Result<(), Box<dyn std::error::Error>>;

async fn connect() -> Result<MySqlConnection, Box<dyn std::error::Error>> {
    let url = env::var("DATABASE_URL")?;
    let options: MySqlConnectOptions = url.parse()?;
    Ok(MySqlConnection::connect(&options).await?)
}

/// E2E-1: connect, `SELECT 1`, one row, `getInt(1) == 1`.
#[tokio::test]
async fn connect_and_select_constant() -> TestResult {
    let mut conn = connect().await?;

    let mut rows = conn.query("SELECT 1").await?;
    assert!(rows.next());
    assert_eq!(rows.try_get::<i32>(0)?, Some(1));

    Ok(())
}

/// E2E-2: the text protocol decodes one value of each MySQL column type,
/// plus its nullable sibling, correctly.
#[tokio::test]
async fn text_protocol_type_matrix() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP TABLE IF EXISTS e2e_all_types").await?;
    conn.execute(
        "CREATE TABLE e2e_all_types (
           `bit` BIT(1) NOT NULL, `bit_null` BIT(1) NULL,
           `tinyint` TINYINT NOT NULL, `tinyint_null` TINYINT NULL,
           `smallint` SMALLINT NOT NULL, `smallint_null` SMALLINT NULL,
           `int` INT NOT NULL, `int_null` INT NULL,
           `bigint` BIGINT NOT NULL, `bigint_null` BIGINT NULL,
           `bigint_unsigned` BIGINT UNSIGNED NOT NULL, `bigint_unsigned_null` BIGINT UNSIGNED NULL,
           `decimal` DECIMAL(9,2) NOT NULL, `decimal_null` DECIMAL(9,2) NULL,
           `date` DATE NOT NULL, `date_null` DATE NULL,
           `time` TIME NOT NULL, `time_null` TIME NULL,
           `datetime` DATETIME NOT NULL, `datetime_null` DATETIME NULL,
           `enum` ENUM('a','b') NOT NULL, `enum_null` ENUM('a','b') NULL,
           `set` SET('a','b') NOT NULL, `set_null` SET('a','b') NULL,
           `json` JSON NOT NULL, `json_null` JSON NULL
         )",
    )
    .await?;
    conn.execute(
        "INSERT INTO e2e_all_types VALUES (
           b'1', NULL, 127, NULL, 32767, NULL, 2147483647, NULL,
           9223372036854775807, NULL, 18446744073709551615, NULL,
           9999999.99, NULL, '2020-01-01', NULL, '12:34:56', NULL,
           '2020-01-01 12:34:56', NULL, 'a', NULL, 'a,b', NULL,
           '{\"a\": 1}', NULL
         )",
    )
    .await?;

    let mut rows = conn.query("SELECT * FROM e2e_all_types").await?;
    assert!(rows.next());

    assert_eq!(
        rows.try_get::<bit_vec::BitVec>(0)?.as_ref().map(|b| b.get(0)),
        Some(Some(true))
    );
    assert_eq!(rows.try_get::<bit_vec::BitVec>(1)?, None);
    assert_eq!(rows.try_get::<i8>(2)?, Some(127));
    assert_eq!(rows.try_get::<i8>(3)?, None);
    assert_eq!(rows.try_get::<i16>(4)?, Some(32767));
    assert_eq!(rows.try_get::<i16>(5)?, None);
    assert_eq!(rows.try_get::<i32>(6)?, Some(2147483647));
    assert_eq!(rows.try_get::<i32>(7)?, None);
    assert_eq!(rows.try_get::<i64>(8)?, Some(9223372036854775807));
    assert_eq!(rows.try_get::<i64>(9)?, None);
    assert_eq!(rows.try_get::<u64>(10)?, Some(u64::MAX));
    assert_eq!(rows.try_get::<u64>(11)?, None);
    assert_eq!(
        rows.try_get::<bigdecimal::BigDecimal>(12)?.map(|d| d.to_string()),
        Some("9999999.99".to_owned())
    );
    assert_eq!(rows.try_get::<bigdecimal::BigDecimal>(13)?, None);
    assert_eq!(rows.try_get::<String>(20)?.as_deref(), Some("a"));
    assert_eq!(rows.try_get::<String>(21)?, None);
    assert_eq!(
        rows.try_get::<Vec<String>>(22)?,
        Some(vec!["a".to_owned(), "b".to_owned()])
    );
    assert_eq!(rows.try_get::<Vec<String>>(23)?, None);
    assert_eq!(
        rows.try_get::<serde_json::Value>(24)?,
        Some(serde_json::json!({"a": 1}))
    );
    assert_eq!(rows.try_get::<serde_json::Value>(25)?, None);

    Ok(())
}

/// E2E-3: client-prepared statement substitutes a bound parameter before
/// sending `COM_QUERY`.
#[tokio::test]
async fn client_prepared_parameterized_query() -> TestResult {
    let mut conn = connect().await?;

    let mut stmt = conn.client_prepared_statement("SELECT ?, ?");
    stmt.bind(1i32).bind(Option::<i32>::None);
    let mut rows = stmt.execute_query().await?;

    assert!(rows.next());
    assert_eq!(rows.try_get::<i32>(0)?, Some(1));
    assert_eq!(rows.try_get::<i32>(1)?, None);

    Ok(())
}

/// E2E-4: a server-prepared statement reuses its handle across executions.
#[tokio::test]
async fn server_prepared_parameterized_query_reuses_handle() -> TestResult {
    let mut conn = connect().await?;

    let mut stmt = conn.server_prepared_statement("SELECT ?");
    stmt.bind(1i32);
    let mut rows = stmt.execute_query().await?;
    assert!(rows.next());
    assert_eq!(rows.try_get::<i32>(0)?, Some(1));
    drop(rows);

    stmt.clear_parameters();
    stmt.bind(2i32);
    let mut rows = stmt.execute_query().await?;
    assert!(rows.next());
    assert_eq!(rows.try_get::<i32>(0)?, Some(2));

    Ok(())
}

/// E2E-5: streamed select with `fetchSize = 1` yields every row.
#[tokio::test]
async fn streamed_select_with_small_fetch_size() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP TEMPORARY TABLE IF EXISTS e2e_stream").await?;
    conn.execute("CREATE TEMPORARY TABLE e2e_stream (name VARCHAR(32))").await?;

    for i in 0..50 {
        conn.execute(&format!("INSERT INTO e2e_stream VALUES ('row{i}')")).await?;
    }

    let mut stmt = conn.server_prepared_statement("SELECT name FROM e2e_stream ORDER BY name");
    let mut rows = stmt.execute_cursor(1).await?;

    let mut count = 0;
    while rows.next().await? {
        let _: Option<String> = rows.try_get(0)?;
        count += 1;
    }
    assert_eq!(count, 50);

    Ok(())
}

/// E2E-6: mixed DDL/DML batch reports a per-statement count for each.
#[tokio::test]
async fn batch_ddl_dml_mixed() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP TABLE IF EXISTS e2e_batch_t").await?;

    let mut stmt = conn.create_statement();
    stmt.add_batch("CREATE TABLE e2e_batch_t (c1 INT)");
    stmt.add_batch("INSERT INTO e2e_batch_t VALUES (1)");
    stmt.add_batch("DROP TABLE e2e_batch_t");

    let counts = stmt.execute_batch().await?;
    assert_eq!(counts, vec![0, 1, 0]);

    Ok(())
}

/// E2E-7: with autocommit off, `COMMIT` makes a row visible and `ROLLBACK`
/// leaves it absent.
#[tokio::test]
async fn transaction_commit_and_rollback() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP TEMPORARY TABLE IF EXISTS e2e_tx").await?;
    conn.execute("CREATE TEMPORARY TABLE e2e_tx (n INT)").await?;
    conn.set_autocommit(false).await?;

    conn.execute("INSERT INTO e2e_tx VALUES (1)").await?;
    conn.commit().await?;

    conn.execute("INSERT INTO e2e_tx VALUES (2)").await?;
    conn.rollback().await?;

    let mut rows = conn.query("SELECT n FROM e2e_tx ORDER BY n").await?;
    let mut seen = Vec::new();
    while rows.next() {
        seen.push(rows.try_get::<i32>(0)?.unwrap());
    }
    assert_eq!(seen, vec![1]);

    Ok(())
}

/// E2E-8: inserting A, setting a savepoint, inserting B, and rolling back to
/// the savepoint leaves only A.
#[tokio::test]
async fn savepoint_rollback() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP TEMPORARY TABLE IF EXISTS e2e_sp").await?;
    conn.execute("CREATE TEMPORARY TABLE e2e_sp (n INT)").await?;
    conn.set_autocommit(false).await?;

    conn.execute("INSERT INTO e2e_sp VALUES (1)").await?;
    let sp = conn.set_savepoint("sp1").await?;
    conn.execute("INSERT INTO e2e_sp VALUES (2)").await?;
    conn.rollback_to_savepoint(&sp).await?;
    conn.commit().await?;

    let mut rows = conn.query("SELECT n FROM e2e_sp ORDER BY n").await?;
    let mut seen = Vec::new();
    while rows.next() {
        seen.push(rows.try_get::<i32>(0)?.unwrap());
    }
    assert_eq!(seen, vec![1]);

    Ok(())
}

/// E2E-9: a stored procedure with two `SELECT`s and one OUT parameter.
#[tokio::test]
async fn stored_procedure_multi_result_and_out_parameter() -> TestResult {
    let mut conn = connect().await?;
    conn.execute("DROP PROCEDURE IF EXISTS e2e_demo_sp").await?;
    conn.execute(
        "CREATE PROCEDURE e2e_demo_sp(IN p1 VARCHAR(64), INOUT p2 INT)
         BEGIN
           SELECT p1;
           SET p2 = p2 + 1;
           SELECT CONCAT('zyxw', p1);
         END",
    )
    .await?;

    let mut call = conn.prepare_call("{call e2e_demo_sp(?, ?)}")?;
    call.set_in(1, "abcdefg")?;
    call.set_in(2, 1i32)?;
    call.register_out_parameter(2, MySqlOutType::Integer).await?;

    let mut strings = Vec::new();

    let mut is_result_set = call.execute().await?;
    loop {
        if is_result_set {
            let mut rows = call.take_result_set().expect("result set frame");
            assert!(rows.next());
            strings.push(rows.try_get::<String>(0)?.unwrap());
        }
        if !call.has_more_results() {
            break;
        }
        is_result_set = call.get_more_results().await?;
    }

    assert_eq!(strings, vec!["abcdefg", "zyxwabcdefg"]);
    assert_eq!(call.get_out_parameter::<i32>(2)?, Some(2));
    assert_eq!(call.get_out_parameter_by_name::<i32>("p2")?, Some(2));

    Ok(())
}

/// E2E-10: `caching_sha2_password` authentication over TLS.
#[tokio::test]
async fn caching_sha2_password_over_tls() -> TestResult {
    let url = env::var("DATABASE_URL_CACHING_SHA2")?;
    let options: MySqlConnectOptions = url.parse()?;
    let mut conn = MySqlConnection::connect(&options).await?;
    conn.ping().await?;
    Ok(())
}

#[tokio::test]
async fn transaction_isolation_round_trips() -> TestResult {
    let mut conn = connect().await?;

    conn.set_transaction_isolation(MySqlIsolationLevel::RepeatableRead).await?;
    assert_eq!(
        conn.get_transaction_isolation().await?,
        MySqlIsolationLevel::RepeatableRead
    );

    Ok(())
}
