use url::Url;

/// Returns the network location of a URL: `[user[:password]@]host[:port]`
///
/// The port only appears when it differs from the scheme default, as the parser drops
/// default ports. URLs without a host yield an empty string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sectioncrawl::url::network_location;
///
/// let url = Url::parse("https://example.com:8443/path").unwrap();
/// assert_eq!(network_location(&url), "example.com:8443");
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(network_location(&url), "example.com");
/// ```
pub fn network_location(url: &Url) -> String {
    let Some(host) = url.host_str() else {
        return String::new();
    };

    let mut netloc = String::new();
    if !url.username().is_empty() {
        netloc.push_str(url.username());
        if let Some(password) = url.password() {
            netloc.push(':');
            netloc.push_str(password);
        }
        netloc.push('@');
    }

    netloc.push_str(host);
    if let Some(port) = url.port() {
        netloc.push_str(&format!(":{}", port));
    }

    netloc
}
