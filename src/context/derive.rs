//! Context derivation from active-window observations
//!
//! Maps a raw `{title, url, app_name}` observation onto the identifying
//! string the rest of the system treats as the context. Search-result pages
//! become `"<query> | <Site>"`, document windows become
//! `"<document> | <App>"`, everything else falls back to the application
//! name, the window title, or the URL, in that order.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Context reported when nothing about the active window is known
pub const UNKNOWN_CONTEXT: &str = "Unknown Context";

/// One observation of the currently focused window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWindow {
    /// Window title
    pub title: String,

    /// Page URL, when the window is a browser tab that exposes one
    pub url: Option<String>,

    /// Owning application name
    pub app_name: String,
}

/// Document-based applications whose windows identify a file.
/// The second column is the label used in the derived context.
const FILE_BASED_APPS: &[(&str, &str)] = &[
    ("Microsoft Word", "Word"),
    ("Preview", "Preview"),
    ("Adobe Acrobat", "Acrobat"),
    ("Google Docs", "Google Docs"),
    ("Notepad", "Notepad"),
    ("Sublime Text", "Sublime"),
    ("Visual Studio Code", "VS Code"),
    ("Pages", "Pages"),
    ("TextEdit", "TextEdit"),
];

static GOOGLE_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) - Google Search$").expect("valid Google search regex"));
static WIKIPEDIA_SEARCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Search results for (.*?) - Wikipedia").expect("valid Wikipedia search regex")
});
static YOUTUBE_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(.*?)" - YouTube"#).expect("valid YouTube search regex"));
static DUCKDUCKGO_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) at DuckDuckGo").expect("valid DuckDuckGo search regex"));
static BING_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) - Bing").expect("valid Bing search regex"));
static YAHOO_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) - Yahoo Search").expect("valid Yahoo search regex"));
static AMAZON_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Amazon\.com\s*: (.+)").expect("valid Amazon search regex"));
static EBAY_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) \| eBay").expect("valid eBay search regex"));
static LINKEDIN_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) \| LinkedIn").expect("valid LinkedIn search regex"));
static GENERIC_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*?) - (.*)").expect("valid generic search regex"));
static FILE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("valid file extension regex"));

/// Derive the display context for an active-window observation
pub fn derive_context(window: &ActiveWindow) -> String {
    let query = search_query(&window.title, window.url.as_deref());

    // Document windows identify a file before any app-name formatting.
    if query.is_none() && !window.title.is_empty() && !window.app_name.is_empty() {
        if let Some((_, label)) = FILE_BASED_APPS
            .iter()
            .find(|(app, _)| window.app_name.contains(app))
        {
            let document = FILE_EXTENSION.replace(&window.title, "");
            return format!("{} | {}", document.trim(), label);
        }
    }

    if let Some(query) = query {
        return format!("{} | {}", query, capitalize(&site_name(window.url.as_deref())));
    }

    if !window.title.is_empty() && !window.app_name.is_empty() {
        if window.app_name.contains("Code") {
            // Title is "<file> - <workspace>"; workspace or extensionless
            // titles mean an unsaved buffer.
            let mut file = window
                .title
                .split(" - ")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            if !file.contains('.') || file.to_lowercase().contains("workspace") {
                file = "Untitled".to_string();
            }
            return format!("{} | VSCode", file);
        }
        if window.app_name.to_lowercase().contains("chatgpt") {
            return "ChatGPT".to_string();
        }
        return window.app_name.clone();
    }

    if !window.title.is_empty() {
        return window.title.clone();
    }
    if let Some(url) = window.url.as_deref().filter(|url| !url.is_empty()) {
        return url.to_string();
    }
    UNKNOWN_CONTEXT.to_string()
}

/// Extract a search query from a search-result page title.
///
/// The first branch whose URL matches wins; a title that does not fit that
/// site's pattern yields no query rather than trying other sites. Titles
/// mentioning "search" without a recognized URL go through a generic
/// `"<query> - <site>"` split.
fn search_query(title: &str, url: Option<&str>) -> Option<String> {
    let url = url.unwrap_or("");

    let captured = if url.contains("google.com/search") || url.contains("google.com/webhp") {
        capture(&GOOGLE_SEARCH, title)
    } else if url.contains("wikipedia.org") && title.contains("Search results") {
        capture(&WIKIPEDIA_SEARCH, title)
    } else if url.contains("youtube.com/results") {
        capture(&YOUTUBE_SEARCH, title)
    } else if url.contains("duckduckgo.com/") {
        capture(&DUCKDUCKGO_SEARCH, title)
    } else if url.contains("bing.com/search") {
        capture(&BING_SEARCH, title)
    } else if url.contains("search.yahoo.com") {
        capture(&YAHOO_SEARCH, title)
    } else if url.contains("amazon.com/s") {
        capture(&AMAZON_SEARCH, title)
    } else if url.contains("ebay.com/sch/") {
        capture(&EBAY_SEARCH, title)
    } else if url.contains("linkedin.com/search/results") {
        capture(&LINKEDIN_SEARCH, title)
    } else if title.to_lowercase().contains("search") {
        capture(&GENERIC_SEARCH, title)
    } else {
        None
    };

    captured.filter(|query| !query.is_empty())
}

fn capture(pattern: &Regex, title: &str) -> Option<String> {
    pattern
        .captures(title)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// First hostname label of the URL, without a leading "www."
fn site_name(url: Option<&str>) -> String {
    url.and_then(|raw| Url::parse(raw).ok())
        .and_then(|parsed| {
            parsed.host_str().map(|host| {
                host.strip_prefix("www.")
                    .unwrap_or(host)
                    .split('.')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
        })
        .filter(|site| !site.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
