//! End-to-end composition scenarios through the public API.

use serde_json::json;
use sql_template::{Arg, Fragment, SqlResult, Statement, Value, join, raw, sql};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn values_json(q: &Fragment) -> serde_json::Value {
    serde_json::to_value(q.values().unwrap()).unwrap()
}

#[test]
fn deeply_nested_statement() {
    let q = sql!(
        "SELECT * FROM {} WHERE name = ANY({}) {}",
        sql!("cars"),
        vec![1, 2, 3],
        sql!(
            "and surname = {} {}",
            "Alex",
            sql!(
                "and age <= {} {}",
                80,
                sql!(
                    "LEFT INNER JOIN people ON ({})",
                    sql!("people.car_id = cars._id and people.age >= {}", 18)
                )
            )
        )
    );

    assert_eq!(
        q.text().unwrap(),
        "SELECT * FROM cars WHERE name = ANY($1) and surname = $2 and age <= $3 \
         LEFT INNER JOIN people ON (people.car_id = cars._id and people.age >= $4)"
    );
    assert_eq!(
        q.sql().unwrap(),
        "SELECT * FROM cars WHERE name = ANY(?) and surname = ? and age <= ? \
         LEFT INNER JOIN people ON (people.car_id = cars._id and people.age >= ?)"
    );
    assert_eq!(values_json(&q), json!([[1, 2, 3], "Alex", 80, 18]));
}

#[test]
fn rows_as_one_array_parameter() {
    let data = vec![vec![0.5, 0.25], vec![0.125, 1.0]];
    let q = sql!("INSERT INTO randoms VALUES {}", data);

    assert_eq!(q.text().unwrap(), "INSERT INTO randoms VALUES $1");
    assert_eq!(values_json(&q), json!([[[0.5, 0.25], [0.125, 1.0]]]));
}

#[test]
fn bulk_insert_from_rows() {
    let rows = [("Peter", "25"), ("Wendy", "24"), ("Andrew", "32")];
    let tuples: Vec<Fragment> = rows
        .iter()
        .map(|(name, age)| sql!("({})", join!(*name, *age)))
        .collect();
    let values = sql_template::build(tuples.into_iter().map(Arg::from));
    let q = sql!("\n  INSERT INTO {} VALUES {}\n", sql!("people"), values);

    assert_eq!(q.text().unwrap(), "  INSERT INTO people VALUES ($1,$2),($3,$4),($5,$6)");
    assert_eq!(q.sql().unwrap(), "  INSERT INTO people VALUES (?,?),(?,?),(?,?)");
    assert_eq!(
        values_json(&q),
        json!(["Peter", "25", "Wendy", "24", "Andrew", "32"])
    );
}

#[test]
fn column_list_from_fragments() {
    let columns = vec![sql!("name varchar,"), sql!("age int2")];
    let q = sql!("\n  CREATE TABLE IF NOT EXISTS {}({});\n", sql!("people"), columns);

    assert_eq!(
        q.text().unwrap(),
        "  CREATE TABLE IF NOT EXISTS people(name varchar,age int2);"
    );
    assert!(q.values().unwrap().is_empty());
}

#[test]
fn lazy_scalar_value() {
    let q = sql!("SELECT * FROM people WHERE name = {}", Arg::lazy(|_| "hey"));
    assert_eq!(q.text().unwrap(), "SELECT * FROM people WHERE name = $1");
    assert_eq!(values_json(&q), json!(["hey"]));
}

#[test]
fn lazy_values_inside_joined_fragments() {
    let table: Vec<f64> = vec![0.03, 0.99, 0.6, 0.5, 0.9];
    let slot_values = Arc::new(table.clone());
    let data: Vec<Fragment> = (0..table.len())
        .map(|i| {
            let slot_values = Arc::clone(&slot_values);
            sql!("{}", Arg::lazy(move |_| slot_values[i]))
                .set_name(format!("value_{i}"))
                .unwrap()
        })
        .collect();

    let q = sql!(
        "INSERT INTO {} VALUES ({})",
        Arg::lazy(|_| sql!("randoms")),
        sql_template::build(data.iter().map(Arg::from))
    );

    assert_eq!(
        q.text().unwrap(),
        "INSERT INTO randoms VALUES ($1,$2,$3,$4,$5)"
    );
    assert_eq!(values_json(&q), json!(table));
}

#[test]
fn custom_joined_nested_statements() {
    let statements = || vec![sql!("a"), sql!("b"), sql!("c"), sql!("d")];
    let statement = sql!(
        "WITH {} as A, {} as B",
        sql_template::build(statements().into_iter().map(Arg::from))
            .join_by("+")
            .unwrap(),
        sql_template::build(statements().into_iter().map(Arg::from))
            .join_by("-")
            .unwrap()
    );
    let root = join!(&statement, &statement, &statement)
        .join_by(" and ")
        .unwrap();

    let one = "WITH a+b+c+d as A, a-b-c-d as B";
    assert_eq!(root.text().unwrap(), format!("{one} and {one} and {one}"));
    assert!(root.values().unwrap().is_empty());
}

#[test]
fn mixed_queries_and_values_render_each_getter_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let data = Arg::lazy(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        "fn data"
    });

    let q = join!(
        "value",
        sql!(
            "query {}",
            sql!("nested query {}", sql!("nested nested query = {}, f = {}", 1, data))
        ),
        "other value",
        sql!("other query")
    );

    for _ in 0..3 {
        assert_eq!(
            q.text().unwrap(),
            "$1,query nested query nested nested query = $2, f = $3,$4,other query"
        );
        assert_eq!(
            q.sql().unwrap(),
            "?,query nested query nested nested query = ?, f = ?,?,other query"
        );
        assert_eq!(values_json(&q), json!(["value", 1, "fn data", "other value"]));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let piped = q.join_by("|").unwrap();
    assert_eq!(
        piped.text().unwrap(),
        "$1|query nested query nested nested query = $2, f = $3|$4|other query"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn array_of_rows_next_to_lazy_rows() {
    let row = vec![0.1, 0.2, 0.3];
    let q = sql!(
        "INSERT INTO randoms VALUES ({})",
        join!(
            vec![row.clone(), row.clone()],
            sql!("{}", Arg::lazy(|_| vec![vec![0.5, 0.5], vec![0.75, 0.75]]))
        )
    );

    assert_eq!(q.text().unwrap(), "INSERT INTO randoms VALUES ($1,$2)");
    assert_eq!(
        values_json(&q),
        json!([[[0.1, 0.2, 0.3], [0.1, 0.2, 0.3]], [[0.5, 0.5], [0.75, 0.75]]])
    );
}

#[test]
fn named_statement() -> SqlResult<()> {
    let q = sql!("\n      SELECT * FROM {}\n    ", raw("table")).set_name("select_from_table")?;

    let stmt = q.to_statement()?;
    assert_eq!(
        stmt,
        Statement {
            name: Some("select_from_table".to_string()),
            text: "      SELECT * FROM table    ".to_string(),
            sql: "      SELECT * FROM table    ".to_string(),
            values: vec![],
        }
    );
    assert_eq!(stmt.param_count(), 0);
    Ok(())
}

#[test]
fn statement_serializes_for_logging() -> SqlResult<()> {
    let stmt = sql!("SELECT * FROM t WHERE id = ANY({}) AND ok = {}", vec![1, 2], true)
        .set_name("by_ids")?
        .to_statement()?;

    assert_eq!(
        serde_json::to_value(&stmt).unwrap(),
        json!({
            "name": "by_ids",
            "text": "SELECT * FROM t WHERE id = ANY($1) AND ok = $2",
            "sql": "SELECT * FROM t WHERE id = ANY(?) AND ok = ?",
            "values": [[1, 2], true],
        })
    );
    Ok(())
}

#[test]
fn fragments_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Fragment>();
    assert_send_sync::<Arg>();
    assert_send_sync::<Value>();
}

#[test]
fn shared_fragment_renders_across_threads() {
    let q = sql!("a = {} AND b = {}", 1, sql!("{}", Arg::lazy(|_| 2)));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let q = q.clone();
            std::thread::spawn(move || q.text().map(str::to_string))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "a = $1 AND b = $2");
    }
}
