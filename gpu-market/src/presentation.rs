use crate::filter::{FilterCriteria, FilterOptions, FrequencyField, FrequencyMap};
use crate::providers::ProviderId;
use crate::types::{ArticleRecord, PriceTable};
use crate::utils::{text, url};
use serde::Serialize;

const SUMMARY_MAX_CHARS: usize = 280;
const BAR_MAX_WIDTH: usize = 30;

pub const NO_NEWS_MESSAGE: &str = "No provider news available.";
pub const NO_STRUCTURED_NEWS_MESSAGE: &str = "No structured news found.";
pub const NO_MATCHES_MESSAGE: &str = "No articles match the current filters.";

#[derive(Debug, Clone, Serialize)]
pub struct PriceRowView {
    pub provider: String,
    pub prices: Vec<String>,
    pub region: String,
    pub focus: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceTableView {
    pub headers: Vec<String>,
    pub rows: Vec<PriceRowView>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsItemView {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsSectionView {
    pub provider: String,
    pub items: Vec<NewsItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub prices: PriceTableView,
    pub news: Vec<NewsSectionView>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleRowView {
    pub provider: String,
    pub title: String,
    pub summary: String,
    pub location: String,
    pub tags: String,
    pub actors: String,
    pub published: String,
    pub link: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub field: FrequencyField,
    pub title: String,
    pub points: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructuredNewsPage {
    pub options: FilterOptions,
    pub criteria: FilterCriteria,
    pub total_articles: usize,
    pub rows: Vec<ArticleRowView>,
    pub charts: Vec<ChartSeries>,
    pub empty_message: Option<String>,
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => "n/a".to_string(),
    }
}

/// Every row of the table is kept, including rows without any price.
pub fn price_table_view(table: &PriceTable) -> PriceTableView {
    let mut headers = vec!["Provider".to_string()];
    headers.extend(table.models.iter().cloned());
    headers.push("Region".to_string());
    headers.push("Focus".to_string());

    let rows = table
        .rows
        .iter()
        .map(|row| PriceRowView {
            provider: row.provider.clone(),
            prices: row.prices.iter().map(|p| format_price(*p)).collect(),
            region: row.region.clone(),
            focus: row.focus.clone(),
        })
        .collect();

    let highlights = table
        .models
        .iter()
        .filter_map(|model| {
            table
                .cheapest(model)
                .map(|(provider, price)| format!("Cheapest {}: {} at {}/h", model, provider, format_price(Some(price))))
        })
        .collect();

    PriceTableView { headers, rows, highlights }
}

fn news_item_view(article: &ArticleRecord) -> NewsItemView {
    NewsItemView {
        title: article.title.clone(),
        link: article.link.clone(),
        published: article.published.clone(),
        summary: text::smart_truncate(&text::strip_html(&article.summary), SUMMARY_MAX_CHARS),
        tags: article.tags.iter().cloned().collect(),
    }
}

/// Providers without articles get no section.
pub fn overview_page(table: &PriceTable, news: &[(ProviderId, Vec<ArticleRecord>)]) -> OverviewPage {
    let sections: Vec<NewsSectionView> = news
        .iter()
        .filter(|(_, articles)| !articles.is_empty())
        .map(|(provider, articles)| NewsSectionView {
            provider: provider.display_name().to_string(),
            items: articles.iter().map(news_item_view).collect(),
        })
        .collect();

    let empty_message = sections.is_empty().then(|| NO_NEWS_MESSAGE.to_string());

    OverviewPage {
        prices: price_table_view(table),
        news: sections,
        empty_message,
    }
}

fn article_row_view(article: &ArticleRecord) -> ArticleRowView {
    ArticleRowView {
        provider: article.provider.clone(),
        title: article.title.clone(),
        summary: text::strip_html(&article.summary),
        location: article.location.clone().unwrap_or_default(),
        tags: article.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        actors: article.actors.iter().cloned().collect::<Vec<_>>().join(", "),
        published: article.published.clone(),
        link: article.link.clone(),
        source: url::extract_domain(&article.link).unwrap_or_default(),
    }
}

/// Chart points ordered by descending count, then alphabetically.
pub fn chart_series(field: FrequencyField, counts: &FrequencyMap) -> ChartSeries {
    let mut points: Vec<(String, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    points.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ChartSeries {
        field,
        title: field.label().to_string(),
        points,
    }
}

pub fn structured_news_page(
    all_articles: &[ArticleRecord],
    criteria: &FilterCriteria,
    filtered: &[ArticleRecord],
    frequencies: &[(FrequencyField, FrequencyMap)],
) -> StructuredNewsPage {
    let empty_message = if all_articles.is_empty() {
        Some(NO_STRUCTURED_NEWS_MESSAGE.to_string())
    } else if filtered.is_empty() {
        Some(NO_MATCHES_MESSAGE.to_string())
    } else {
        None
    };

    StructuredNewsPage {
        options: FilterOptions::from_articles(all_articles),
        criteria: criteria.clone(),
        total_articles: all_articles.len(),
        rows: filtered.iter().map(article_row_view).collect(),
        charts: frequencies
            .iter()
            .map(|(field, counts)| chart_series(*field, counts))
            .collect(),
        empty_message,
    }
}

pub fn render_overview_text(page: &OverviewPage) -> String {
    let mut out = String::new();
    out.push_str("# GPU Cloud Market Monitoring Dashboard\n\n");
    out.push_str(&render_price_table_text(&page.prices));

    out.push_str("\n## Provider News\n\n");
    if let Some(message) = &page.empty_message {
        out.push_str(&format!("{}\n", message));
    }

    for section in &page.news {
        out.push_str(&format!("### {}\n\n", section.provider));
        for item in &section.items {
            out.push_str(&format!("**{}**\n{}\n", item.title, item.link));
            if !item.published.is_empty() {
                out.push_str(&format!("*{}*\n", item.published));
            }
            if !item.summary.is_empty() {
                out.push_str(&format!("{}\n", item.summary));
            }
            if !item.tags.is_empty() {
                out.push_str(&format!("Tags: {}\n", item.tags.join(", ")));
            }
            out.push_str("---\n");
        }
        out.push('\n');
    }

    out
}

pub fn render_price_table_text(view: &PriceTableView) -> String {
    let mut cells: Vec<Vec<String>> = vec![view.headers.clone()];
    for row in &view.rows {
        let mut line = vec![row.provider.clone()];
        line.extend(row.prices.iter().cloned());
        line.push(row.region.clone());
        line.push(row.focus.clone());
        cells.push(line);
    }

    let widths: Vec<usize> = (0..view.headers.len())
        .map(|col| cells.iter().map(|line| line.get(col).map_or(0, |c| c.chars().count())).max().unwrap_or(0))
        .collect();

    let mut out = String::from("## GPU Price Comparison (USD per hour)\n\n");
    for (i, line) in cells.iter().enumerate() {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(&format!("| {} |\n", padded.join(" | ")));

        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&format!("| {} |\n", rule.join(" | ")));
        }
    }

    if !view.highlights.is_empty() {
        out.push('\n');
        for highlight in &view.highlights {
            out.push_str(&format!("- {}\n", highlight));
        }
    }

    out
}

pub fn render_structured_text(page: &StructuredNewsPage) -> String {
    let mut out = String::from("# Structured News Extraction\n\n");

    if page.total_articles == 0 {
        out.push_str(&format!("{}\n", NO_STRUCTURED_NEWS_MESSAGE));
        return out;
    }

    out.push_str(&format!(
        "Showing {} of {} articles\n",
        page.rows.len(),
        page.total_articles
    ));
    if !page.criteria.is_empty() {
        out.push_str(&format!("Filters: {}\n", describe_criteria(&page.criteria)));
    }
    out.push('\n');

    if let Some(message) = &page.empty_message {
        out.push_str(&format!("{}\n", message));
    }

    for chart in &page.charts {
        out.push_str(&format!("## {}\n\n", chart.title));
        out.push_str(&render_chart_text(chart));
        out.push('\n');
    }

    if !page.rows.is_empty() {
        out.push_str("## Article Details\n\n");
    }
    for row in &page.rows {
        out.push_str(&format!("### {}: {}\n", row.provider, row.title));
        out.push_str(&format!("Published: {}\n", row.published));
        out.push_str(&format!("Summary: {}\n", row.summary));
        out.push_str(&format!("Location: {}\n", row.location));
        out.push_str(&format!("Tags: {}\n", row.tags));
        out.push_str(&format!("Actors: {}\n", row.actors));
        out.push_str(&format!("Link: {} ({})\n\n", row.link, row.source));
    }

    out
}

/// Horizontal bars scaled to the largest count. Empty series render nothing.
pub fn render_chart_text(chart: &ChartSeries) -> String {
    let Some(max) = chart.points.iter().map(|(_, count)| *count).max() else {
        return String::new();
    };
    let label_width = chart.points.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    chart
        .points
        .iter()
        .map(|(label, count)| {
            let width = (count * BAR_MAX_WIDTH).div_ceil(max.max(1));
            format!("{:<lw$} {} {}\n", label, "#".repeat(width), count, lw = label_width)
        })
        .collect()
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    let parts = [
        ("provider", &criteria.providers),
        ("tag", &criteria.tags),
        ("location", &criteria.locations),
        ("actor", &criteria.actors),
    ];

    parts
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| format!("{} in [{}]", name, values.iter().cloned().collect::<Vec<_>>().join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
