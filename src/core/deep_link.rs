//! # Deep Links
//!
//! Turns external URLs into navigation intents.
//!
//! ```text
//! productsapp://product/42           → Intent::ProductDetail(42)
//! productsapp://category/home%20deco → Intent::ProductList("home deco")
//! anything else                      → None
//! ```
//!
//! Parsing never fails loudly. A malformed link is simply "no intent", and the
//! caller decides whether that deserves an error message.

pub const DEFAULT_SCHEME: &str = "productsapp";

/// Resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ProductDetail(u64),
    ProductList(String),
}

/// The two navigation operations deep links need.
pub trait Navigator {
    fn open_product_list(&mut self, category: Option<&str>);
    fn open_product_detail(&mut self, product_id: u64);
}

/// Extracts the path a deep link addresses.
///
/// For custom app schemes the "host" slot is really the first path segment
/// (`app://product/1`), so everything after `://` is path. Web URLs drop
/// their authority.
fn link_path(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.trim().split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    let rest = rest.split(['?', '#']).next().unwrap_or("");
    let path = if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        rest.split_once('/').map(|(_, path)| path).unwrap_or("")
    } else {
        rest
    };
    Some((scheme, path))
}

/// Parses a deep link into an intent. Any scheme is accepted.
pub fn parse(url: &str) -> Option<Intent> {
    let (_, path) = link_path(url)?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [kind, value] = segments.as_slice() else {
        return None;
    };

    match *kind {
        "product" => value
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Intent::ProductDetail),
        "category" => percent_decode(value).map(Intent::ProductList),
        _ => None,
    }
}

/// Sends the intent to the navigator. Returns false when there was nothing to do.
pub fn dispatch(intent: Option<Intent>, navigator: &mut dyn Navigator) -> bool {
    match intent {
        Some(Intent::ProductDetail(id)) => {
            navigator.open_product_detail(id);
            true
        }
        Some(Intent::ProductList(category)) => {
            navigator.open_product_list(Some(&category));
            true
        }
        None => false,
    }
}

/// Parse and dispatch in one step.
pub fn handle_link(url: &str, navigator: &mut dyn Navigator) -> bool {
    let intent = parse(url);
    log::debug!("Deep link {url:?} resolved to {intent:?}");
    dispatch(intent, navigator)
}

/// Builds the link for an intent under `scheme`.
pub fn create_link(scheme: &str, intent: &Intent) -> String {
    match intent {
        Intent::ProductDetail(id) => format!("{scheme}://product/{id}"),
        Intent::ProductList(category) => {
            format!("{scheme}://category/{}", percent_encode(category))
        }
    }
}

/// Resolver bound to the app's own link scheme.
#[derive(Debug, Clone)]
pub struct DeepLinkResolver {
    scheme: String,
}

impl DeepLinkResolver {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Like [`parse`], but only for links in this resolver's scheme.
    pub fn resolve(&self, url: &str) -> Option<Intent> {
        let (scheme, _) = link_path(url)?;
        if !scheme.eq_ignore_ascii_case(&self.scheme) {
            log::debug!("Ignoring link with foreign scheme {scheme:?}");
            return None;
        }
        parse(url)
    }

    pub fn handle(&self, url: &str, navigator: &mut dyn Navigator) -> bool {
        dispatch(self.resolve(url), navigator)
    }

    pub fn link_for(&self, intent: &Intent) -> String {
        create_link(&self.scheme, intent)
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes `%XX` escapes. Malformed escapes or non-UTF-8 output yield None.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Encodes everything outside the RFC 3986 unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
