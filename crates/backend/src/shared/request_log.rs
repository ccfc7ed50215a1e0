//! Одна цветная строка в консоль на каждый HTTP-запрос:
//! время, длительность, размер ответа, статус, метод, путь.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;
use std::time::Duration;

/// Размер ответа с точками между триадами: 1234567 → "1.234.567"
fn format_size(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// голубой для успешных, коричневый для остальных
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else {
        "33"
    }
}

fn log_line(
    status: StatusCode,
    size: Option<usize>,
    elapsed: Duration,
    method: &Method,
    path: &str,
) -> String {
    let (color, size) = match size {
        Some(n) => (status_color(status), format_size(n)),
        None => ("33", "error".to_string()),
    };
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color,
        Local::now().format("%H:%M:%S"),
        elapsed.as_millis(),
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Middleware: тело ответа читается целиком, чтобы узнать реальный размер
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            println!(
                "{}",
                log_line(parts.status, Some(bytes.len()), start.elapsed(), &method, uri.path())
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(_) => {
            println!(
                "{}",
                log_line(parts.status, None, start.elapsed(), &method, uri.path())
            );
            Response::from_parts(parts, Body::default())
        }
    }
}
