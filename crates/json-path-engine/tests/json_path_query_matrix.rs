
use fixtures_json_path::{bookstore, nested_prices};
use json_path_engine::{
    compile, evaluate, find, EvaluationError, JsonPathError, NodeKind, ParseError,
};
use serde_json::{json, Value};

fn run(path: &str, doc: &Value) -> Vec<Value> {
    find(path, doc)
        .unwrap()
        .into_iter()
        .cloned()
        .collect()
}

#[test]
fn compile_is_idempotent() {
    let first = compile("$.store.book[0].title").unwrap();
    let second = compile("$.store.book[0].title").unwrap();
    assert_eq!(*first, *second);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn round_trip_of_filter_free_path() {
    let doc = json!({"store": {"book": [{"title": "only"}]}});
    assert_eq!(run("$.store.book[0].title", &doc), vec![json!("only")]);
}

#[test]
fn bookstore_member_and_wildcard_queries() {
    let doc = bookstore();

    let authors = run("$.store.book[*].author", &doc);
    assert_eq!(authors.len(), 4);
    assert_eq!(authors[0], json!("Nigel Rees"));
    assert_eq!(authors[3], json!("J. R. R. Tolkien"));

    let everything_in_store = run("$.store.*", &doc);
    assert_eq!(everything_in_store.len(), 2);

    let bracket_name = run("$['store'].bicycle.color", &doc);
    assert_eq!(bracket_name, vec![json!("red")]);
}

#[test]
fn slice_matrix() {
    let doc = json!({"a": [10, 20, 30]});
    assert_eq!(run("$.a[1:]", &doc), vec![json!(20), json!(30)]);
    assert_eq!(run("$.a[-1]", &doc), vec![json!(30)]);

    let doc = json!({"a": [10, 20, 30, 40]});
    assert_eq!(run("$.a[0:-1:2]", &doc), vec![json!(10), json!(30)]);
    assert_eq!(run("$.a[:1]", &doc), vec![json!(10), json!(20)]);

    // Out-of-range bounds clamp instead of failing.
    assert_eq!(run("$.a[2:100]", &doc), vec![json!(30), json!(40)]);
}

#[test]
fn recursive_descent_finds_every_depth_in_document_order() {
    let doc = nested_prices();
    assert_eq!(
        run("$..price", &doc),
        vec![json!(1), json!(2), json!(3), json!(4)]
    );

    let doc = bookstore();
    let prices = run("$..price", &doc);
    assert_eq!(prices.len(), 5);
    assert_eq!(prices[4], json!(19.95));
}

#[test]
fn recursive_descent_keeps_duplicates_from_overlapping_matches() {
    // A criterion matching both a container and a member inside it yields
    // both, in document order.
    let doc = json!({"a": {"a": 1}});
    assert_eq!(run("$..a", &doc), vec![json!({"a": 1}), json!(1)]);

    let doc = json!({"price": {"price": 5}, "other": [{"price": 7}]});
    assert_eq!(
        run("$..price", &doc),
        vec![json!({"price": 5}), json!(5), json!(7)]
    );
}

#[test]
fn recursive_descent_with_subscript() {
    let doc = bookstore();
    let second_title = run("$..book[1].title", &doc);
    assert_eq!(second_title, vec![json!("Sword of Honour")]);
}

#[test]
fn existence_filter_and_complement() {
    let doc = bookstore();

    let with_isbn = run("$.store.book[?(@.isbn)]", &doc);
    assert_eq!(with_isbn.len(), 2);
    assert_eq!(with_isbn[0]["title"], "Moby Dick");

    let without_isbn = run("$.store.book[?(!@.isbn)]", &doc);
    assert_eq!(without_isbn.len(), 2);
    assert_eq!(without_isbn[0]["title"], "Sayings of the Century");
}

#[test]
fn conditional_filters() {
    let doc = bookstore();

    let cheap = run("$.store.book[?(@.price < 10)]", &doc);
    assert_eq!(cheap.len(), 2);

    let by_author = run("$.store.book[?(@.author == 'Evelyn Waugh')].title", &doc);
    assert_eq!(by_author, vec![json!("Sword of Honour")]);

    let fiction = run("$.store.book[?(@.category == 'fiction')]", &doc);
    assert_eq!(fiction.len(), 3);

    let tolkien = run("$.store.book[?(@.author =~ /Tolkien/)].price", &doc);
    assert_eq!(tolkien, vec![json!(22.99)]);
}

#[test]
fn script_filter_wrapper() {
    let doc = bookstore();
    let cheap = run("$.store.book[(@.price < 9)].title", &doc);
    assert_eq!(cheap.len(), 2);
}

#[test]
fn union_subscripts_evaluate_in_key_order() {
    let doc = bookstore();
    let picks = run("$.store.book[0,2].title", &doc);
    assert_eq!(
        picks,
        vec![json!("Sayings of the Century"), json!("Moby Dick")]
    );
}

#[test]
fn missing_paths_yield_empty_not_errors() {
    let doc = bookstore();
    assert_eq!(run("$.store.cd", &doc), Vec::<Value>::new());
    assert_eq!(run("$.store.bicycle[0]", &doc), Vec::<Value>::new());
    assert_eq!(run("$.store.book.color", &doc), Vec::<Value>::new());
}

#[test]
fn evaluate_accepts_precompiled_paths() {
    let doc = bookstore();
    let path = compile("$.store.bicycle.color").unwrap();
    assert_eq!(path.nodes[0].kind, NodeKind::Root);

    let matches = evaluate(&path, &doc).unwrap();
    assert_eq!(matches, vec![&json!("red")]);
}

#[test]
fn malformed_inputs_fail_with_matching_variants() {
    assert!(matches!(
        compile("").map(|_| ()),
        Err(ParseError::EmptyPath)
    ));
    assert!(matches!(
        compile("$.book[0").map(|_| ()),
        Err(ParseError::UnterminatedBracket { .. })
    ));
    assert!(matches!(
        compile("$.book[oops]").map(|_| ()),
        Err(ParseError::InvalidSubscript { .. })
    ));
    assert!(matches!(
        compile("$.book[1:x]").map(|_| ()),
        Err(ParseError::InvalidSlice { .. })
    ));

    let doc = bookstore();
    assert!(matches!(
        find("$.store.book[::0]", &doc),
        Err(JsonPathError::Evaluation(EvaluationError::InvalidStep { .. }))
    ));
}
