use axum::response::Html;

/// The single-page UI. Element ids follow the convention the UI acceptance
/// steps derive from field names and button labels.
const INDEX_HTML: &str = include_str!("../../../static/index.html");

pub async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
