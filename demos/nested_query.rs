use rurl::{QueryOptions, Url, encode_query, parse_query};
use serde_json::{Value, json};

fn main() {
    // Bracketed keys decode into nested values
    let query = parse_query(
        "filter[tags][]=rust&filter[tags][]=url&filter[since]=2024&page=2",
        &QueryOptions::default(),
    );
    println!("{}", Value::Object(query)); // {"filter":{"tags":["rust","url"],"since":"2024"},"page":"2"}

    // and nested values encode back into bracketed keys
    let value = json!({"user": {"name": "Ann Lee", "roles": ["admin", "dev"]}});
    match encode_query(&value, &QueryOptions::default()) {
        Ok(encoded) => println!("{encoded}"), // user%5Bname%5D=Ann+Lee&user%5Broles%5D%5B0%5D=admin&...
        Err(err) => eprintln!("{err}"),
    }

    // Prototype-like keys are never written
    let query = parse_query("a[__proto__][polluted]=1&safe=1", &QueryOptions::default());
    println!("{}", Value::Object(query)); // {"safe":"1"}

    // The URL record keeps its search string and query mapping in sync
    let mut url = Url::parse("https://shop.example.com/search?q=shoes", None);
    url.query_mut().insert("size".into(), json!(["42", "43"]));
    println!("{}", url.search()); // ?q=shoes&size%5B0%5D=42&size%5B1%5D=43

    let options = QueryOptions::new().with_delimiter(";").with_pct_encode_spaces(true);
    match encode_query(&json!({"q": "red shoes", "page": 1}), &options) {
        Ok(encoded) => println!("{encoded}"), // q=red%20shoes;page=1
        Err(err) => eprintln!("{err}"),
    }
}
