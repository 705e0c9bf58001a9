use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use pixelgrab::{Config, ResolutionRequest, fetcher::fetch_image, resolver::resolve_as};
use serde::Serialize;

#[derive(Serialize)]
struct Summary<'a> {
    input: &'a str,
    kind: pixelgrab::UrlKind,
    image_url: &'a str,
    resolved_by: pixelgrab::ResolutionPath,
    tier: pixelgrab::Tier,
    content_type: &'a str,
    width: u32,
    height: u32,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: pixelgrab <url> [output.png]");
    };
    let output = args.next().map(PathBuf::from);

    let config = Config::from_env()?;

    let request = match ResolutionRequest::parse(&input) {
        Ok(request) => request,
        Err(err) => bail!("{}: {}", err.user_message(), err),
    };
    let kind = request.kind();

    let outcome = match resolve_as(kind, request.url(), &config).await {
        Ok(resolved) => fetch_image(resolved.url(), &config)
            .await
            .map(|image| (resolved, image)),
        Err(err) => Err(err),
    };
    let (resolved, image) = match outcome {
        Ok(found) => found,
        Err(err) => bail!("{}: {}", err.user_message(), err),
    };

    let saved_to = match &output {
        Some(path) => {
            let png = image.to_png()?;
            std::fs::write(path, png)
                .with_context(|| format!("writing {}", path.display()))?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let summary = Summary {
        input: &input,
        kind,
        image_url: resolved.url(),
        resolved_by: resolved.path(),
        tier: image.tier,
        content_type: &image.content_type,
        width: image.width,
        height: image.height,
        bytes: image.bytes.len(),
        saved_to,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
