const USAGE: &str = "usage: gameping-healthcheck [url]";
const DEFAULT_URL: &str = "http://127.0.0.1:8080/health";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| DEFAULT_URL.to_string());
    if args.next().is_some() {
        return Err(USAGE.into());
    }
    reqwest::get(&url).await?.error_for_status()?;
    println!("Health check of {url} succeeded");
    Ok(())
}
