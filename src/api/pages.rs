//! Built-in HTML pages

use axum::{http::StatusCode, response::Html};

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <title>Dashboard</title>
</head>
<body>
    <p>You are signed in. <a href="/">Back to the home page</a>.</p>
</body>
</html>
"#;

const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>404 - Page not found</title>
    <style>
        body {
            background: #000;
            color: white;
            font-family: Arial, sans-serif;
            text-align: center;
            padding: 100px;
        }
        h1 { font-size: 4em; color: #0095f6; }
        a { color: #0095f6; text-decoration: none; }
    </style>
</head>
<body>
    <h1>404</h1>
    <h2>Page not found</h2>
    <p><a href="/">&larr; Back to home</a></p>
</body>
</html>
"#;

/// GET /dashboard
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// Fallback for anything no route or static file matched
pub async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}
