use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 需要目录存在，未构建前端时写入占位页面
    if !dist_path.exists() {
        println!("cargo:warning=frontend/dist not found, embedding a placeholder page");
        create_fallback_files(&dist_path);
    }
}

fn create_fallback_files(dist_path: &Path) {
    fs::create_dir_all(dist_path).expect("Failed to create dist directory");

    let fallback_html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>TutorHub</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 600px;
            margin: 100px auto;
            padding: 20px;
            text-align: center;
        }
        code {
            background: #f1f3f4;
            padding: 2px 6px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <h1>TutorHub</h1>
    <p>The API is running, but the web client has not been built.</p>
    <p><code>cd frontend && bun install && bun run build</code></p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), fallback_html)
        .expect("Failed to write fallback index.html");
    fs::create_dir_all(dist_path.join("assets")).expect("Failed to create assets directory");
}
