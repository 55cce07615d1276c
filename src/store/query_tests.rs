use super::*;
use serde_json::json;

#[test]
fn test_empty_query_renders_nothing() {
    let (sql, params) = Query::new().select_sql(Table::Worlds).unwrap();
    assert_eq!(sql, "");
    assert!(params.is_empty());
}

#[test]
fn test_neighbor_lookup_sql() {
    let (sql, params) = Query::new()
        .eq("playlist_id", "p1")
        .lt("order_index", 2)
        .order("order_index", false)
        .limit(1)
        .select_sql(Table::PlaylistItems)
        .unwrap();

    assert_eq!(
        sql,
        " WHERE \"playlist_id\" IS ? AND \"order_index\" < ? \
         ORDER BY \"order_index\" DESC NULLS FIRST LIMIT 1"
    );
    assert_eq!(
        params,
        vec![SqlValue::Text("p1".into()), SqlValue::Integer(2)]
    );
}

#[test]
fn test_boolean_filters_bind_integers() {
    let (sql, params) = Query::new()
        .eq("is_deleted", false)
        .where_sql(Table::Folders)
        .unwrap();
    assert_eq!(sql, " WHERE \"is_deleted\" IS ?");
    assert_eq!(params, vec![SqlValue::Integer(0)]);
}

#[test]
fn test_in_filter_placeholders() {
    let (sql, params) = Query::new()
        .is_in("id", ["a", "x"])
        .where_sql(Table::PlaylistItems)
        .unwrap();
    assert_eq!(sql, " WHERE \"id\" IN (?, ?)");
    assert_eq!(params.len(), 2);

    let (sql, params) = Query::new()
        .is_in("id", Vec::<String>::new())
        .where_sql(Table::PlaylistItems)
        .unwrap();
    assert_eq!(sql, " WHERE 0");
    assert!(params.is_empty());
}

#[test]
fn test_null_comparison_uses_is() {
    let (sql, params) = Query::new()
        .neq("deleted_at", json!(null))
        .where_sql(Table::Folders)
        .unwrap();
    assert_eq!(sql, " WHERE \"deleted_at\" IS NOT ?");
    assert_eq!(params, vec![SqlValue::Null]);
}

#[test]
fn test_unknown_columns_never_reach_sql() {
    let err = Query::new()
        .order("name\"; DROP TABLE mundos; --", true)
        .select_sql(Table::Worlds)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRow { .. }));

    let err = Query::new()
        .eq("nope", 1)
        .where_sql(Table::Worlds)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRow { .. }));
}
