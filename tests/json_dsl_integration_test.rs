use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use jsondsl::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use tokio_postgres::NoTls;

const GENERIC_ROW: &str = "json-dsl";
const ARRAY_ROW: &str = "array";

async fn start_postgres() -> Result<(
    Postgres,
    ContainerAsync<testcontainers_modules::postgres::Postgres>,
)> {
    let _ = env_logger::builder().is_test(true).try_init();

    let pg_container = testcontainers_modules::postgres::Postgres::default()
        .with_host_auth()
        .start()
        .await
        .context("Failed to start Postgres container")?;

    let connection_string = format!(
        "postgres://postgres@{}:{}/postgres",
        pg_container.get_host().await?,
        pg_container.get_host_port_ipv4(5432).await?
    );

    let timeout = Duration::from_secs(30);
    let start_time = Instant::now();

    loop {
        match tokio_postgres::connect(&connection_string, NoTls).await {
            Ok((client, connection)) => {
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        eprintln!("connection error: {}", e);
                    }
                });

                return Ok((Postgres::new(Arc::new(Box::new(client))), pg_container));
            }
            Err(_) if Instant::now().duration_since(start_time) < timeout => {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Err(e) => return Err(anyhow::Error::new(e).context("connecting to postgres")),
        }
    }
}

fn generic_doc(variant: &str) -> String {
    format!(
        r#"{{"obj": {{"i": 5521, "b": true}}, "arr": [{{"d": 4408}}, 10, true, "s"], "num": 1337, "str": "Hello, {} world!", "n": null}}"#,
        variant
    )
}

fn array_doc(variant: &str) -> String {
    format!(r#"[{{"d": 4408}}, 10, true, "{} array"]"#, variant)
}

async fn seed(postgres: &Postgres) -> Result<()> {
    postgres
        .execute(&expr!(
            "CREATE TABLE json_test (name text NOT NULL, data json, datab jsonb)"
        ))
        .await
        .context("creating json_test table")?;

    for (name, data, datab) in [
        (GENERIC_ROW, generic_doc("json"), generic_doc("jsonb")),
        (ARRAY_ROW, array_doc("json"), array_doc("jsonb")),
    ] {
        postgres
            .execute(&expr!(
                "INSERT INTO json_test (name, data, datab) VALUES ({}, {}::json, {}::jsonb)",
                name,
                data,
                datab
            ))
            .await
            .context("inserting fixture row")?;
    }

    Ok(())
}

async fn select_row(postgres: &Postgres, row: &str, chunk: &impl Chunk) -> Value {
    let query = expr_arc!(
        "SELECT ({}) AS result FROM json_test WHERE name = {}",
        chunk.render_chunk(),
        row.to_string()
    );
    let mut rows = postgres.query_raw(&query).await.unwrap();

    assert_eq!(rows.len(), 1);
    rows.remove(0)["result"].clone()
}

#[tokio::test]
async fn json_operators() {
    let (postgres, _container) = start_postgres().await.unwrap();
    seed(&postgres).await.unwrap();

    let data = JsonExpression::column("data");

    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.field_by_key("str")).await,
        json!("Hello, json world!")
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &data.field_by_key("obj").field_by_key("i")
        )
        .await,
        json!(5521)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.field_by_key_text("num")).await,
        json!("1337")
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.field_by_key("n")).await,
        json!(null)
    );

    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &data.array_element(0)).await,
        json!({"d": 4408})
    );
    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &data.array_element(-1)).await,
        json!("json array")
    );
    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &data.array_element_text(1)).await,
        json!("10")
    );

    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.object_at_path(["obj", "i"])).await,
        json!(5521)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &data.object_at_path_text(["arr", "0", "d"])
        )
        .await,
        json!("4408")
    );

    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &data.array_length()).await,
        json!(4)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.extract_path(["obj"])).await,
        json!({"i": 5521, "b": true})
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &data.extract_path_text(["obj", "b"])
        )
        .await,
        json!("true")
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.type_of()).await,
        json!("object")
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &data.strip_nulls()).await,
        json!({
            "obj": {"i": 5521, "b": true},
            "arr": [{"d": 4408}, 10, true, "s"],
            "num": 1337,
            "str": "Hello, json world!"
        })
    );

    // literal document, no table involved
    let doc = JsonExpression::value(generic_doc("inline"));
    assert_eq!(
        postgres
            .select_one(&doc.field_by_key_text("str"))
            .await
            .unwrap(),
        json!("Hello, inline world!")
    );
}

#[tokio::test]
async fn jsonb_operators() {
    let (postgres, _container) = start_postgres().await.unwrap();
    seed(&postgres).await.unwrap();

    let datab = JsonbExpression::column("datab");

    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.field_by_key_text("str")).await,
        json!("Hello, jsonb world!")
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.field_by_key("obj").field_by_key("i")
        )
        .await,
        json!(5521)
    );

    // containment
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.contains(&JsonbExpression::value(r#"{"num": 1337}"#))
        )
        .await,
        json!(true)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.contains(&JsonbExpression::value(
                r#"{"obj": {"i": 5521, "b": true}}"#
            ))
        )
        .await,
        json!(true)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.contains(&JsonbExpression::value(r#"{"num": 1338}"#))
        )
        .await,
        json!(false)
    );
    assert_eq!(
        select_row(
            &postgres,
            ARRAY_ROW,
            &datab.contains(&JsonbExpression::value(r#"["jsonb array", 10]"#))
        )
        .await,
        json!(true)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &JsonbExpression::value(r#"{"num": 1337}"#).contained_in(&datab)
        )
        .await,
        json!(true)
    );

    // key existence
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.has_key("str")).await,
        json!(true)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.has_key("nope")).await,
        json!(false)
    );
    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &datab.has_key("jsonb array")).await,
        json!(true)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.has_any_key(["str", "nope"])).await,
        json!(true)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.has_any_key(Vec::<String>::new())
        )
        .await,
        json!(false)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.has_all_keys(["str", "obj", "num"])
        )
        .await,
        json!(true)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.has_all_keys(["str", "nope"])).await,
        json!(false)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.has_all_keys(Vec::<String>::new())
        )
        .await,
        json!(true)
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.has_key("str").and(datab.has_key("num"))
        )
        .await,
        json!(true)
    );

    // concatenation and the delete family
    assert_eq!(
        postgres
            .select_one(
                &JsonbExpression::value(r#"{"a": 1, "b": 2}"#)
                    .concat(&JsonbExpression::value(r#"{"b": 3, "c": 4}"#))
            )
            .await
            .unwrap(),
        json!({"a": 1, "b": 3, "c": 4})
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.delete("n").delete("arr")).await,
        json!({
            "obj": {"i": 5521, "b": true},
            "num": 1337,
            "str": "Hello, jsonb world!"
        })
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.delete_all(["n", "arr", "obj"])
        )
        .await,
        json!({"num": 1337, "str": "Hello, jsonb world!"})
    );
    assert_eq!(
        postgres
            .select_one(&JsonbExpression::value(r#"["a", "b"]"#).delete_element(-1))
            .await
            .unwrap(),
        json!(["a"])
    );
    assert_eq!(
        postgres
            .select_one(
                &JsonbExpression::value(r#"["a", {"b": 1, "c": 2}]"#).delete_path(["1", "b"])
            )
            .await
            .unwrap(),
        json!(["a", {"c": 2}])
    );

    // function family
    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &datab.array_length()).await,
        json!(4)
    );
    assert_eq!(
        select_row(&postgres, GENERIC_ROW, &datab.extract_path(["obj"])).await,
        json!({"i": 5521, "b": true})
    );
    assert_eq!(
        select_row(
            &postgres,
            GENERIC_ROW,
            &datab.extract_path_text(["obj", "i"])
        )
        .await,
        json!("5521")
    );
    assert_eq!(
        select_row(&postgres, ARRAY_ROW, &datab.type_of()).await,
        json!("array")
    );
    assert_eq!(
        postgres
            .select_one(&JsonbExpression::value(r#"[{"f1": 1, "f2": null}, 2, null, 3]"#).strip_nulls())
            .await
            .unwrap(),
        json!([{"f1": 1}, 2, null, 3])
    );
    assert_eq!(
        postgres
            .select_one(&JsonbExpression::value(r#"{"a": 1}"#).pretty())
            .await
            .unwrap(),
        json!("{\n    \"a\": 1\n}")
    );
}
