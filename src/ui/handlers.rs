//! Web UI handlers

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::api::dashboard::load_summary;
use crate::api::error::ApiError;
use crate::api::extract::WebIdentity;
use crate::api::server::SharedState;
use crate::auth::middleware::{DASHBOARD_PATH, LOGIN_PATH};

/// Root page; the dashboard is the only landing spot
pub async fn index() -> Redirect {
    Redirect::temporary(DASHBOARD_PATH)
}

/// Login page - posts credentials to the JSON API
pub async fn login_page() -> Html<String> {
    let form = r#"
                <form id="auth-form" class="space-y-4" data-endpoint="/api/auth/login">
                    <input name="email" type="email" placeholder="Email" required
                        class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded text-white placeholder-gray-400 focus:outline-none focus:border-blue-500" />
                    <input name="password" type="password" placeholder="Password" required
                        class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded text-white placeholder-gray-400 focus:outline-none focus:border-blue-500" />
                    <button type="submit" class="w-full px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium">Sign in</button>
                </form>
                <p class="mt-4 text-sm text-gray-400">No account? <a href="/register" class="text-blue-400 hover:underline">Register</a></p>
    "#;
    Html(auth_page("Sign in", form))
}

/// Registration page
pub async fn register_page() -> Html<String> {
    let form = r#"
                <form id="auth-form" class="space-y-4" data-endpoint="/api/auth/register">
                    <input name="name" type="text" placeholder="Name" required minlength="2"
                        class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded text-white placeholder-gray-400 focus:outline-none focus:border-blue-500" />
                    <input name="email" type="email" placeholder="Email" required
                        class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded text-white placeholder-gray-400 focus:outline-none focus:border-blue-500" />
                    <input name="password" type="password" placeholder="Password (6+ characters)" required minlength="6"
                        class="w-full px-4 py-2 bg-gray-700 border border-gray-600 rounded text-white placeholder-gray-400 focus:outline-none focus:border-blue-500" />
                    <button type="submit" class="w-full px-4 py-2 bg-green-600 hover:bg-green-700 rounded font-medium">Create account</button>
                </form>
                <p class="mt-4 text-sm text-gray-400">Already registered? <a href="/login" class="text-blue-400 hover:underline">Sign in</a></p>
    "#;
    Html(auth_page("Create account", form))
}

fn auth_page(title: &str, form: &str) -> String {
    format!(
        r#"
<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - DocSave</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen flex items-center justify-center">
    <div class="w-full max-w-md">
        <h1 class="text-3xl font-bold mb-8 text-center">DocSave</h1>
        <div class="bg-gray-800 rounded-lg p-8 shadow-xl">
            <h2 class="text-xl font-semibold mb-6">{title}</h2>
            <div id="form-error" class="hidden mb-4 px-4 py-2 bg-red-900 text-red-200 rounded text-sm"></div>
            {form}
        </div>
    </div>

    <script>
        (function() {{
            const form = document.getElementById('auth-form');
            const errorBox = document.getElementById('form-error');

            form.addEventListener('submit', async (event) => {{
                event.preventDefault();
                errorBox.classList.add('hidden');

                const body = Object.fromEntries(new FormData(form).entries());
                const res = await fetch(form.dataset.endpoint, {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify(body),
                }});

                if (res.ok) {{
                    window.location.href = '/dashboard';
                    return;
                }}

                const data = await res.json().catch(() => ({{}}));
                errorBox.textContent = data.message || 'Something went wrong';
                errorBox.classList.remove('hidden');
            }});
        }})();
    </script>
</body>
</html>
        "#
    )
}

/// Dashboard page - counts and the latest documents and links
pub async fn dashboard(
    State(state): State<SharedState>,
    identity: Result<WebIdentity, ApiError>,
) -> Response {
    let Ok(WebIdentity(identity)) = identity else {
        return Redirect::temporary(LOGIN_PATH).into_response();
    };

    let summary = match load_summary(&state, identity.user_id).await {
        Ok(summary) => summary,
        Err(e) => return e.into_response(),
    };

    let document_rows: String = summary
        .recent_documents
        .iter()
        .map(|d| {
            format!(
                r#"
                    <li class="px-4 py-3 border-b border-gray-700 flex justify-between">
                        <span>{}</span>
                        <span class="text-xs px-2 py-1 rounded-full bg-gray-700">{}</span>
                    </li>"#,
                escape_html(&d.title),
                d.kind
            )
        })
        .collect();

    let link_rows: String = summary
        .recent_links
        .iter()
        .map(|l| {
            format!(
                r#"
                    <li class="px-4 py-3 border-b border-gray-700">
                        <a href="{}" target="_blank" rel="noopener" class="text-blue-400 hover:underline">{}</a>
                    </li>"#,
                escape_html(&l.url),
                escape_html(&l.title)
            )
        })
        .collect();

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Dashboard - DocSave</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
    <div class="container mx-auto px-8 py-8 max-w-6xl">
        <header class="mb-8 flex justify-between items-center">
            <div>
                <h1 class="text-3xl font-bold mb-2">Welcome, {name}</h1>
                <p class="text-gray-400">{total_documents} documents, {total_links} links</p>
            </div>
            <button id="logout" class="px-4 py-2 bg-red-600 hover:bg-red-700 rounded font-medium">Log out</button>
        </header>

        <div class="grid grid-cols-2 gap-8">
            <div class="bg-gray-800 rounded-lg overflow-hidden shadow-xl">
                <h2 class="px-4 py-3 bg-gray-700 font-semibold">Recent documents</h2>
                <ul>{document_rows}</ul>
            </div>
            <div class="bg-gray-800 rounded-lg overflow-hidden shadow-xl">
                <h2 class="px-4 py-3 bg-gray-700 font-semibold">Recent links</h2>
                <ul>{link_rows}</ul>
            </div>
        </div>
    </div>

    <script>
        document.getElementById('logout').addEventListener('click', async () => {{
            await fetch('/api/auth/logout', {{ method: 'POST' }});
            window.location.href = '/login';
        }});
    </script>
</body>
</html>
        "#,
        name = escape_html(&identity.claims.name),
        total_documents = summary.total_documents,
        total_links = summary.total_links,
    );

    Html(html).into_response()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
