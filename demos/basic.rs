use rurl::Url;

fn main() {
    // Parse an absolute URL
    let mut url = Url::parse("https://user@Example.com:443/docs/guide.html?lang=en#intro", None);

    println!("URL: {}", url.href()); // https://user@example.com/docs/guide.html?lang=en#intro
    println!("Protocol: {}", url.protocol()); // https:
    println!("Host: {}", url.host()); // example.com (default port dropped)
    println!("Pathname: {}", url.pathname()); // /docs/guide.html
    println!("Segments: {:?}", url.segments()); // ["docs", "guide.html"]
    println!("Extension: {:?}", url.extension()); // Some("html")
    println!("Origin: {}", url.origin()); // https://example.com

    // Mutate in place; dependent fields follow
    url.set_host("docs.example.com:8443");
    url.set_extension("md");
    println!("Updated: {url}"); // https://user@docs.example.com:8443/docs/guide.md?lang=en#intro

    // Resolve relative references against a base
    let next = url.resolve("../api/?v=2");
    println!("Resolved: {next}"); // https://docs.example.com:8443/api/?v=2
    println!("Taken from base: {:?}", next.from_base());

    println!("{}", rurl::resolve_path("/foo/bar/baz", "../quux/baz", None)); // /foo/quux/baz
}
