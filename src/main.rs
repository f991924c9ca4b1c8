use serde_json::{json, Map};
use tracklink::{
    adapt_html, decode_path, encode_payload, get_click_tracking_result, get_click_tracking_url,
    get_open_tracking_url, Configuration, Payload,
};

fn main() {
    println!("tracklink demo");
    println!("==============");

    let mut metadata = Map::new();
    metadata.insert("campaign".to_string(), json!("spring"));
    metadata.insert("recipient".to_string(), json!(42));

    let config = Configuration {
        base_click_tracking_url: Some("https://track.example.com/c/".to_string()),
        base_open_tracking_url: Some("https://track.example.com/o/".to_string()),
        ..Configuration::default()
    };

    // Generate links
    println!("\n1. Generating tracking links:");
    let click_link =
        get_click_tracking_url("https://example.com/page", Some(&metadata), &config).unwrap();
    println!("  click: {}", click_link);
    let open_link = get_open_tracking_url(Some(&metadata), &config).unwrap();
    println!("  open:  {}", open_link);

    // Decode them back
    println!("\n2. Decoding the click link:");
    let result = get_click_tracking_result(&click_link, None, &config).unwrap();
    println!("  tracked_url: {:?}", result.tracked_url);
    println!("  metadata:    {}", json!(result.metadata));
    println!("  timestamp:   {}", result.timestamp);

    // Encrypted tokens
    println!("\n3. Encrypted tokens (same payload, different tokens):");
    let encrypted_config = Configuration {
        encryption_key: Some(fernet::Fernet::generate_key()),
        ..config.clone()
    };
    let payload = Payload {
        url: Some("https://example.com/page".to_string()),
        ..Payload::default()
    };
    let token_a = encode_payload(&payload, &encrypted_config).unwrap();
    let token_b = encode_payload(&payload, &encrypted_config).unwrap();
    println!("  token a: {}...", &token_a[..32]);
    println!("  token b: {}...", &token_b[..32]);
    println!("  differ:  {}", token_a != token_b);
    let decoded = decode_path(&token_a, None, false, &encrypted_config).unwrap();
    println!("  decoded tracked_url: {:?}", decoded.tracked_url);

    // HTML rewriting
    println!("\n4. HTML rewriting:");
    let html = concat!(
        r#"<html><body><a href="https://example.com/buy">Buy</a> "#,
        r#"<a href="mailto:hi@example.com">Write us</a></body></html>"#,
    );
    let rewritten = adapt_html(html, Some(&metadata), true, true, &config).unwrap();
    println!("  {}", rewritten);
}
