use gpu_market::{
    compute_frequency, filter_articles, ArticleRecord, FilterCriteria, FilterOptions, FrequencyField, FrequencyMap,
};
use std::collections::BTreeSet;

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn article(title: &str, provider: &str, tags: &[&str], actors: &[&str], location: Option<&str>) -> ArticleRecord {
    ArticleRecord {
        title: title.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        published: String::new(),
        summary: String::new(),
        provider: provider.to_string(),
        tags: set(tags),
        location: location.map(|l| l.to_string()),
        actors: set(actors),
    }
}

/// The two-article fixture: a US GPU pricing story and a European AI story.
fn fixture() -> Vec<ArticleRecord> {
    vec![
        article("GPU prices drop", "AWS", &["gpu", "price"], &["AWS"], Some("US")),
        article("AI research hub", "Google Cloud", &["ai"], &["Google"], Some("Europe")),
    ]
}

fn larger_fixture() -> Vec<ArticleRecord> {
    vec![
        article("H100 capacity", "CoreWeave", &["gpu", "cloud"], &["CoreWeave", "NVIDIA"], Some("US")),
        article("Sovereign cloud", "OVHcloud", &["cloud"], &["OVHcloud"], Some("Europe")),
        article("Partnership", "AWS", &["partnership", "ai"], &["AWS", "NVIDIA"], None),
        article("Price update", "Lambda Labs", &["price", "update"], &[], Some("US")),
        article("Quiet post", "AWS", &[], &[], None),
    ]
}

#[test]
fn test_empty_criteria_is_identity() {
    let articles = larger_fixture();
    let filtered = filter_articles(&articles, &FilterCriteria::new());
    assert_eq!(filtered, articles);
}

#[test]
fn test_tag_filter_scenario() {
    let articles = fixture();
    let criteria = FilterCriteria::new().with_tags(["price"]);

    let filtered = filter_articles(&articles, &criteria);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0], articles[0]);
}

#[test]
fn test_tag_frequency_scenario() {
    let counts = compute_frequency(&fixture(), FrequencyField::Tags);

    let expected: FrequencyMap = [("gpu", 1), ("price", 1), ("ai", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(counts, expected);
}

#[test]
fn test_filter_is_idempotent() {
    let articles = larger_fixture();
    let criteria = FilterCriteria::new().with_tags(["cloud", "ai"]).with_actors(["NVIDIA"]);

    let once = filter_articles(&articles, &criteria);
    let twice = filter_articles(&once, &criteria);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn test_tags_use_or_semantics_and_preserve_order() {
    let articles = larger_fixture();
    let criteria = FilterCriteria::new().with_tags(["update", "gpu"]);

    let titles: Vec<String> = filter_articles(&articles, &criteria).into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["H100 capacity", "Price update"]);
}

#[test]
fn test_dimensions_combine_with_and() {
    let articles = larger_fixture();
    let criteria = FilterCriteria::new().with_tags(["cloud"]).with_locations(["Europe"]);

    let filtered = filter_articles(&articles, &criteria);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].provider, "OVHcloud");
}

#[test]
fn test_missing_location_never_matches_location_filter() {
    let articles = larger_fixture();
    let criteria = FilterCriteria::new().with_locations(["US", "Europe"]);

    let filtered = filter_articles(&articles, &criteria);
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|a| a.location.is_some()));
}

#[test]
fn test_provider_filter_and_unknown_provider() {
    let articles = larger_fixture();

    let aws = filter_articles(&articles, &FilterCriteria::new().with_providers(["AWS"]));
    assert_eq!(aws.len(), 2);
    assert!(aws.iter().all(|a| a.provider == "AWS"));

    let unknown = filter_articles(&articles, &FilterCriteria::new().with_providers(["Nonexistent Cloud"]));
    assert!(unknown.is_empty());
}

#[test]
fn test_actor_filter() {
    let articles = larger_fixture();
    let filtered = filter_articles(&articles, &FilterCriteria::new().with_actors(["NVIDIA"]));

    let providers: Vec<&str> = filtered.iter().map(|a| a.provider.as_str()).collect();
    assert_eq!(providers, vec!["CoreWeave", "AWS"]);
}

#[test]
fn test_frequency_of_empty_set_is_empty() {
    for field in FrequencyField::ALL {
        assert!(compute_frequency(&[], field).is_empty(), "{} should be empty", field);
    }
}

#[test]
fn test_location_and_actor_frequency_skip_missing_values() {
    let articles = larger_fixture();

    let locations = compute_frequency(&articles, FrequencyField::Location);
    assert_eq!(locations.get("US"), Some(&2));
    assert_eq!(locations.get("Europe"), Some(&1));
    assert_eq!(locations.len(), 2);

    let actors = compute_frequency(&articles, FrequencyField::Actors);
    assert_eq!(actors.get("NVIDIA"), Some(&2));
    assert_eq!(actors.values().sum::<usize>(), 5);
}

#[test]
fn test_frequency_over_filtered_set() {
    let articles = larger_fixture();
    let filtered = filter_articles(&articles, &FilterCriteria::new().with_locations(["US"]));

    let tags = compute_frequency(&filtered, FrequencyField::Tags);
    assert_eq!(tags.len(), 4);
    assert!(!tags.contains_key("partnership"));

    let nothing = filter_articles(&articles, &FilterCriteria::new().with_tags(["launch"]));
    assert!(compute_frequency(&nothing, FrequencyField::Tags).is_empty());
}

#[test]
fn test_filter_options() {
    let options = FilterOptions::from_articles(&larger_fixture());

    assert_eq!(options.providers, vec!["CoreWeave", "OVHcloud", "AWS", "Lambda Labs"]);
    assert_eq!(options.tags, vec!["ai", "cloud", "gpu", "partnership", "price", "update"]);
    assert_eq!(options.locations, vec!["Europe", "US"]);
    assert_eq!(options.actors, vec!["AWS", "CoreWeave", "NVIDIA", "OVHcloud"]);
}

#[test]
fn test_frequency_field_parsing() {
    assert_eq!("tags".parse::<FrequencyField>(), Ok(FrequencyField::Tags));
    assert_eq!("Location".parse::<FrequencyField>(), Ok(FrequencyField::Location));
    assert_eq!("actor".parse::<FrequencyField>(), Ok(FrequencyField::Actors));
    assert!("summary".parse::<FrequencyField>().is_err());
}
