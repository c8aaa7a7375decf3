use super::*;
use crate::filter::{FilterMap, FilterRequest};
use crate::registry::{AliasMap, ColumnPolicy, MatchMode, SchemaRegistry, TableDescriptor};
use crate::value::{ColumnValues, SqlValue};

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_tables(&[
            TableDescriptor::new("authors", "a"),
            TableDescriptor::new("recipes", "r"),
            TableDescriptor::new("ratings", "rt"),
            TableDescriptor::new("users", "usr"),
            TableDescriptor::new("favorite_recipes", "fr"),
        ])
        .with_columns(&[
            ColumnPolicy::text("first_name"),
            ColumnPolicy::text("last_name"),
            ColumnPolicy::text("username"),
            ColumnPolicy::text("name"),
            ColumnPolicy::text("full_name"),
            ColumnPolicy::numeric("id"),
            ColumnPolicy::numeric("rating"),
        ])
        .with_writables(&["users", "recipes", "view_later"])
}

const RECIPE_ALIASES: AliasMap<'static> = AliasMap::new(&[
    ("name", "r."),
    ("full_name", "a."),
    ("rating", "rt."),
    ("id", "r."),
]);

const RECIPE_FILTERS: FilterMap<'static> =
    FilterMap::new(&[("author", "full_name"), ("name", "name"), ("rating", "rating")]);

fn placeholders(sql: &str) -> Vec<usize> {
    sql.split('$')
        .skip(1)
        .map(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap()
        })
        .collect()
}

// ==================== JOIN ====================

#[test]
fn test_join_default_keyword() {
    let sql = join_sql(
        &registry(),
        &[Join::new("authors", "r.author_id", "a.id")],
        JoinKind::default(),
    )
    .unwrap();
    assert_eq!(sql, "JOIN authors a ON r.author_id = a.id");
}

#[test]
fn test_join_keeps_input_order() {
    let joins = [
        Join::new("recipes", "fr.recipe_id", "r.id"),
        Join::new("authors", "r.author_id", "a.id"),
    ];
    let sql = join_sql(&registry(), &joins, JoinKind::Full).unwrap();
    assert_eq!(
        sql,
        "FULL JOIN recipes r ON fr.recipe_id = r.id FULL JOIN authors a ON r.author_id = a.id"
    );
}

#[test]
fn test_join_rejects_bad_input() {
    let reg = registry();
    assert!(join_sql(&reg, &[Join::new("", "a", "b")], JoinKind::Inner)
        .unwrap_err()
        .is_invalid_argument());
    assert!(join_sql(&reg, &[Join::new("nope", "a.id", "b.id")], JoinKind::Inner)
        .unwrap_err()
        .is_unknown_table());
    assert!(join_sql(&reg, &[Join::new("authors", "1=1 OR a.id", "a.id")], JoinKind::Inner).is_err());
    assert_eq!(join_sql(&reg, &[], JoinKind::Left).unwrap(), "");
}

// ==================== SELECT ====================

#[test]
fn test_select_bare_and_aliased() {
    let reg = registry();
    assert_eq!(
        select_sql(&reg, &["name", "description"], "recipes", false).unwrap(),
        "SELECT name, description FROM recipes"
    );
    assert_eq!(
        select_sql(&reg, &["r.name", "a.full_name AS author"], "recipes", true).unwrap(),
        "SELECT r.name, a.full_name AS author FROM recipes r"
    );
}

#[test]
fn test_select_rejects_bad_input() {
    let reg = registry();
    let empty: [&str; 0] = [];
    assert!(select_sql(&reg, &empty, "recipes", false)
        .unwrap_err()
        .is_invalid_argument());
    assert!(select_sql(&reg, &["name"], "nope", true)
        .unwrap_err()
        .is_unknown_table());
    assert!(select_sql(&reg, &["name; DROP TABLE users"], "recipes", false).is_err());
}

// ==================== WHERE ====================

#[test]
fn test_where_loose_wraps_text() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg)
        .build(&ColumnValues::new().with("name", "good"))
        .unwrap();
    assert_eq!(clause.sql, "WHERE name ILIKE $1");
    assert_eq!(clause.params, vec![SqlValue::text("%good%")]);
}

#[test]
fn test_where_bool_on_text_column_binds_text() {
    let reg = registry();
    let values = ColumnValues::new().with("name", true);
    let clause = WhereBuilder::new(&reg).build(&values).unwrap();
    assert_eq!(clause.sql, "WHERE name ILIKE $1");
    assert_eq!(clause.params, vec![SqlValue::text("%true%")]);

    let clause = WhereBuilder::new(&reg).exact(true).build(&values).unwrap();
    assert_eq!(clause.sql, "WHERE name = $1");
    assert_eq!(clause.params, vec![SqlValue::text("true")]);
}

#[test]
fn test_where_strict_never_wraps() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg)
        .exact(true)
        .build(&ColumnValues::new().with("name", "good").with("username", "lm"))
        .unwrap();
    assert_eq!(clause.sql, "WHERE name = $1 AND username = $2");
    assert_eq!(
        clause.params,
        vec![SqlValue::text("good"), SqlValue::text("lm")]
    );
}

#[test]
fn test_where_with_aliases() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg)
        .aliases(RECIPE_ALIASES)
        .build(&ColumnValues::new().with("name", "soup").with("full_name", "ina"))
        .unwrap();
    assert_eq!(clause.sql, "WHERE r.name ILIKE $1 AND a.full_name ILIKE $2");
}

#[test]
fn test_where_numeric_binds_int_in_both_modes() {
    let reg = registry();
    let values = ColumnValues::new().with("rating", "4").with("id", 12);
    for mode in [MatchMode::Loose, MatchMode::Strict] {
        let clause = WhereBuilder::new(&reg).mode(mode).build(&values).unwrap();
        assert_eq!(clause.sql, "WHERE rating = $1 AND id = $2");
        assert_eq!(clause.params, vec![SqlValue::Int(4), SqlValue::Int(12)]);
    }
}

#[test]
fn test_where_loose_stringifies_int_on_text_column() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg)
        .build(&ColumnValues::new().with("name", 7))
        .unwrap();
    assert_eq!(clause.params, vec![SqlValue::text("%7%")]);
}

#[test]
fn test_where_placeholders_contiguous_from_start() {
    let reg = registry();
    let values = ColumnValues::new()
        .with("first_name", "l")
        .with("last_name", "lmon")
        .with("rating", 3);
    let clause = WhereBuilder::starting_at(&reg, 4)
        .unwrap()
        .build(&values)
        .unwrap();
    assert_eq!(placeholders(&clause.sql), vec![4, 5, 6]);
    assert_eq!(clause.params.len(), values.len());
    assert_eq!(clause.next_index(), 7);
}

#[test]
fn test_where_start_must_be_positive() {
    assert!(WhereBuilder::starting_at(&registry(), 0)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn test_where_empty_map() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg).build(&ColumnValues::new()).unwrap();
    assert!(clause.is_empty());
    assert!(clause.params.is_empty());

    let clause = WhereBuilder::new(&reg)
        .returning(&["id"])
        .build(&ColumnValues::new())
        .unwrap();
    assert_eq!(clause.sql, "RETURNING id");
}

#[test]
fn test_where_returning() {
    let reg = registry();
    let clause = WhereBuilder::new(&reg)
        .exact(true)
        .returning(&["id", "username"])
        .build(&ColumnValues::new().with("username", "lm"))
        .unwrap();
    assert_eq!(clause.sql, "WHERE username = $1 RETURNING id, username");
}

#[test]
fn test_where_unknown_column() {
    let reg = registry();
    let err = WhereBuilder::new(&reg)
        .build(&ColumnValues::new().with("colour", "red"))
        .unwrap_err();
    assert!(err.is_unknown_column());

    let err = WhereBuilder::new(&reg)
        .aliases(RECIPE_ALIASES)
        .build(&ColumnValues::new().with("username", "lm"))
        .unwrap_err();
    assert!(err.is_unknown_column());
}

#[test]
fn test_where_is_repeatable() {
    let reg = registry();
    let builder = WhereBuilder::new(&reg).aliases(RECIPE_ALIASES);
    let values = ColumnValues::new().with("name", "soup").with("rating", 5);
    assert_eq!(builder.build(&values).unwrap(), builder.build(&values).unwrap());
}

// ==================== ORDER BY ====================

#[test]
fn test_order_by_two_keys_with_direction() {
    let req = FilterRequest::new()
        .with("orderBy", "name")
        .with("orderBy2", "rating")
        .with("chronOrder", "asc");
    let sql = OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap();
    assert_eq!(sql, "ORDER BY r.name, rt.rating ASC");
}

#[test]
fn test_order_by_direction_without_key_is_dropped() {
    let req = FilterRequest::new().with("chronOrder", "desc").with("name", "soup");
    assert_eq!(OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap(), "");
    let req = FilterRequest::new().with("chronOrder", "newest");
    assert_eq!(OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap(), "");
    let req = FilterRequest::new().with("chronOrder", 1);
    assert_eq!(OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap(), "");
    assert_eq!(
        OrderByBuilder::new(RECIPE_ALIASES)
            .build(&FilterRequest::new())
            .unwrap(),
        ""
    );
}

#[test]
fn test_order_by_key_roles_ignore_arrival_order() {
    let req = FilterRequest::new()
        .with("ORDERBY2", "name")
        .with("chronorder", " DESC ")
        .with("orderby", "Rating");
    let sql = OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap();
    assert_eq!(sql, "ORDER BY rt.rating, r.name DESC");
}

#[test]
fn test_order_by_rejects_non_text_direction_with_key() {
    let req = FilterRequest::new()
        .with("chronOrder", 1)
        .with("orderBy", "name");
    assert!(OrderByBuilder::new(RECIPE_ALIASES)
        .build(&req)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn test_order_by_secondary_only() {
    let req = FilterRequest::new().with("orderBy2", "name");
    assert_eq!(
        OrderByBuilder::new(RECIPE_ALIASES).build(&req).unwrap(),
        "ORDER BY r.name"
    );
}

#[test]
fn test_order_by_translates_filter_names() {
    let req = FilterRequest::new().with("orderBy", "author");
    let sql = OrderByBuilder::new(RECIPE_ALIASES)
        .translate(RECIPE_FILTERS)
        .build(&req)
        .unwrap();
    assert_eq!(sql, "ORDER BY a.full_name");
}

#[test]
fn test_order_by_rejects_bad_values() {
    let builder = OrderByBuilder::new(RECIPE_ALIASES);
    let bad_dir = FilterRequest::new()
        .with("orderBy", "name")
        .with("chronOrder", "sideways");
    assert!(builder.build(&bad_dir).unwrap_err().is_invalid_argument());

    let unknown = FilterRequest::new().with("orderBy", "colour");
    assert!(builder.build(&unknown).unwrap_err().is_unknown_column());

    let numeric = FilterRequest::new().with("orderBy", 3);
    assert!(builder.build(&numeric).unwrap_err().is_invalid_argument());
}

// ==================== INSERT ====================

fn user_values() -> ColumnValues {
    ColumnValues::new()
        .with("first_name", "l")
        .with("last_name", "lmon")
        .with("username", "lm")
}

#[test]
fn test_insert_basic() {
    let q = InsertBuilder::new(&registry(), "users")
        .values(user_values())
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "INSERT INTO users (first_name, last_name, username) VALUES ($1, $2, $3)"
    );
    assert_eq!(
        q.params(),
        &[
            SqlValue::text("l"),
            SqlValue::text("lmon"),
            SqlValue::text("lm")
        ]
    );
}

#[test]
fn test_insert_returning_and_coercion() {
    let q = InsertBuilder::new(&registry(), "view_later")
        .set("id", "3")
        .set("note", "tonight")
        .returning(&["id"])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "INSERT INTO view_later (id, note) VALUES ($1, $2) RETURNING id"
    );
    assert_eq!(q.params(), &[SqlValue::Int(3), SqlValue::text("tonight")]);
}

#[test]
fn test_insert_empty_uses_default_values() {
    let q = InsertBuilder::new(&registry(), "recipes").build().unwrap();
    assert_eq!(q.sql(), "INSERT INTO recipes DEFAULT VALUES");
    assert!(q.params().is_empty());
}

#[test]
fn test_insert_rejects_unknown_table_and_bad_columns() {
    let reg = registry();
    let err = InsertBuilder::new(&reg, "invalidTable")
        .values(user_values())
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "Table name invalidTable doesn't exist!");

    // registered for reads, not writes
    assert!(InsertBuilder::new(&reg, "authors")
        .set("full_name", "x")
        .build()
        .unwrap_err()
        .is_unknown_table());

    assert!(InsertBuilder::new(&reg, "users")
        .set("name) VALUES (1); --", "x")
        .build()
        .unwrap_err()
        .is_invalid_argument());
}

// ==================== UPDATE ====================

#[test]
fn test_update_returning() {
    let q = UpdateBuilder::new(&registry(), "users")
        .values(user_values())
        .returning(&["first_name", "username"])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE users SET first_name = $1, last_name = $2, username = $3 RETURNING first_name, username"
    );
    assert_eq!(q.params().len(), 3);
}

#[test]
fn test_update_where_continues_numbering() {
    let q = UpdateBuilder::new(&registry(), "users")
        .set("first_name", "lu")
        .set("last_name", "I2")
        .and_eq("username", "lm")
        .returning(&["id", "username"])
        .build()
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE users SET first_name = $1, last_name = $2 WHERE username = $3 RETURNING id, username"
    );
    assert_eq!(
        q.params(),
        &[
            SqlValue::text("lu"),
            SqlValue::text("I2"),
            SqlValue::text("lm")
        ]
    );
}

#[test]
fn test_update_never_pattern_writes() {
    let q = UpdateBuilder::new(&registry(), "recipes")
        .set("name", "Soup")
        .set("rating", "5")
        .build()
        .unwrap();
    assert_eq!(q.sql(), "UPDATE recipes SET name = $1, rating = $2");
    assert_eq!(q.params(), &[SqlValue::text("Soup"), SqlValue::Int(5)]);
}

#[test]
fn test_update_rejects_bad_input() {
    let reg = registry();
    assert!(UpdateBuilder::new(&reg, "users")
        .build()
        .unwrap_err()
        .is_invalid_argument());
    assert!(UpdateBuilder::new(&reg, "ratings")
        .set("rating", 1)
        .build()
        .unwrap_err()
        .is_unknown_table());
    assert!(UpdateBuilder::new(&reg, "users")
        .set("colour", "red")
        .build()
        .unwrap_err()
        .is_unknown_column());
}

// ==================== SelectStatement ====================

#[test]
fn test_select_statement_composes_fragments() {
    let reg = registry();
    let select = select_sql(&reg, &["r.name", "rt.rating"], "recipes", true).unwrap();
    let joins = join_sql(
        &reg,
        &[Join::new("ratings", "r.id", "rt.recipe_id")],
        JoinKind::Inner,
    )
    .unwrap();
    let filter = WhereBuilder::new(&reg)
        .aliases(RECIPE_ALIASES)
        .build(&ColumnValues::new().with("name", "soup"))
        .unwrap();
    let order = OrderByBuilder::new(RECIPE_ALIASES)
        .build(&FilterRequest::new())
        .unwrap();

    let q = SelectStatement::new(select)
        .push(joins)
        .filter(filter)
        .unwrap()
        .push(order)
        .build();
    assert_eq!(
        q.sql(),
        "SELECT r.name, rt.rating FROM recipes r JOIN ratings rt ON r.id = rt.recipe_id WHERE r.name ILIKE $1"
    );
    assert_eq!(q.params(), &[SqlValue::text("%soup%")]);
}

#[test]
fn test_select_statement_checks_numbering() {
    let reg = registry();
    let late = WhereBuilder::starting_at(&reg, 3)
        .unwrap()
        .build(&ColumnValues::new().with("id", 1))
        .unwrap();
    let err = SelectStatement::new("SELECT id FROM recipes")
        .filter(late)
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_built_query_params_ref_matches_params() {
    let q = InsertBuilder::new(&registry(), "users")
        .values(user_values())
        .build()
        .unwrap();
    assert_eq!(q.params_ref().len(), 3);
    assert_eq!(q.build_sql(), q.sql());
}

// ==================== DELETE ====================

#[test]
fn test_delete_requires_condition() {
    let reg = registry();
    assert!(DeleteBuilder::new(&reg, "users")
        .build()
        .unwrap_err()
        .is_invalid_argument());
    assert!(DeleteBuilder::new(&reg, "authors")
        .and_eq("id", 1)
        .build()
        .unwrap_err()
        .is_unknown_table());
}

#[test]
fn test_delete_is_exact_match() {
    let q = DeleteBuilder::new(&registry(), "users")
        .and_eq("username", "lm")
        .and_eq("id", "2")
        .build()
        .unwrap();
    assert_eq!(q.sql(), "DELETE FROM users WHERE username = $1 AND id = $2");
    assert_eq!(q.params(), &[SqlValue::text("lm"), SqlValue::Int(2)]);
}
