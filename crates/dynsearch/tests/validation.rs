//! Validation of search templates against schemas and custom rules.

use dynsearch::{
    ConditionList, Constraint, Criterion, CriterionValue, FieldSchema, Operator, Schema,
    SearchEngine, SearchError, SearchTemplate,
};

struct Product;

struct ProductSearch {
    criteria: Vec<Criterion>,
    schema: Schema,
    price_from: Option<i64>,
    price_to: Option<i64>,
}

impl ProductSearch {
    fn new(criteria: Vec<Criterion>) -> Self {
        ProductSearch {
            criteria,
            schema: Schema::builder()
                .field("title", [Constraint::NotBlank, Constraint::size(1, 20)])
                .field("sku", [Constraint::pattern("[A-Z]{2}-[0-9]{4}").unwrap()])
                .field("price", [Constraint::min(0)])
                .field("category", [Constraint::one_of(["BOOK", "GAME"])])
                .build(),
            price_from: None,
            price_to: None,
        }
    }

    fn priced(mut self, from: i64, to: i64) -> Self {
        self.price_from = Some(from);
        self.price_to = Some(to);
        self
    }
}

impl SearchTemplate for ProductSearch {
    type Target = Product;

    fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    fn reference_schema(&self) -> Option<&dyn FieldSchema> {
        Some(&self.schema)
    }

    fn custom_validate<'a>(&'a self, conditions: ConditionList<'a>) -> Option<ConditionList<'a>> {
        Some(conditions.add(
            || matches!((self.price_from, self.price_to), (Some(from), Some(to)) if from > to),
            "'price_from' must not be greater than 'price_to'",
        ))
    }
}

#[test]
fn valid_request_has_no_messages() {
    let search = ProductSearch::new(vec![
        Criterion::new("title", Operator::Contains, "rust").unwrap(),
        Criterion::new("sku", Operator::Equal, "AB-1234").unwrap(),
        Criterion::new("category", Operator::In, vec!["BOOK"]).unwrap(),
    ])
    .priced(1, 10);
    assert!(SearchEngine::new().validate(&search).is_empty());
}

#[test]
fn unknown_keys_are_reported_in_order() {
    let search = ProductSearch::new(vec![
        Criterion::new("owner_id", Operator::Equal, 7).unwrap(),
        Criterion::new("title", Operator::Contains, "rust").unwrap(),
        Criterion::new("secret", Operator::NotNull, CriterionValue::Null).unwrap(),
    ]);
    assert_eq!(
        SearchEngine::new().validate(&search),
        vec![
            "Field 'owner_id' isn't allowed searchable key",
            "Field 'secret' isn't allowed searchable key",
        ]
    );
}

#[test]
fn custom_and_syntax_messages_accumulate() {
    let search = ProductSearch::new(vec![
        Criterion::new("price", Operator::GreaterThan, -5).unwrap(),
        Criterion::new("sku", Operator::Equal, "nope").unwrap(),
        Criterion::new("category", Operator::In, vec!["BOOK", "FOOD"]).unwrap(),
    ])
    .priced(10, 1);

    assert_eq!(
        SearchEngine::new().validate(&search),
        vec![
            "'price_from' must not be greater than 'price_to'",
            "must be greater than or equal to 0",
            "must match \"[A-Z]{2}-[0-9]{4}\"",
            "must be one of [BOOK, GAME]",
        ]
    );
}

#[test]
fn null_values_pass_value_constraints() {
    let search = ProductSearch::new(vec![
        Criterion::new("price", Operator::Equal, CriterionValue::Null).unwrap(),
        Criterion::new("sku", Operator::NotEqual, CriterionValue::Null).unwrap(),
    ]);
    assert!(SearchEngine::new().validate(&search).is_empty());
}

#[test]
fn rejected_request_surfaces_joined_messages() {
    let search = ProductSearch::new(vec![
        Criterion::new("owner_id", Operator::Equal, 7).unwrap(),
        Criterion::new("title", Operator::Equal, "   ").unwrap(),
    ]);
    let err = SearchEngine::new().where_clause(&search).unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Field 'owner_id' isn't allowed searchable key; must not be blank"
    );
}

#[test]
fn custom_validate_may_decline() {
    struct Open(Vec<Criterion>);

    impl SearchTemplate for Open {
        type Target = Product;

        fn criteria(&self) -> &[Criterion] {
            &self.0
        }

        fn custom_validate<'a>(&'a self, _: ConditionList<'a>) -> Option<ConditionList<'a>> {
            None
        }
    }

    let search = Open(vec![Criterion::new("anything", Operator::Equal, 1).unwrap()]);
    assert!(SearchEngine::new().validate(&search).is_empty());
    assert_eq!(
        SearchEngine::new().where_clause(&search).unwrap(),
        "AND anything = 1"
    );
}
