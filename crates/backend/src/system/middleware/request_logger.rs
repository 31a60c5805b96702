use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Форматирует число с разделителями тысяч (точками)
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result
}

/// Middleware для логирования HTTP запросов: метод, путь, статус,
/// длительность и реальный размер тела ответа.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(
                "{} {} -> {} | {}ms | body error: {}",
                method,
                uri.path(),
                parts.status.as_u16(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let size = format_number(bytes.len());
    let elapsed_ms = start.elapsed().as_millis();
    if parts.status.is_success() {
        tracing::info!(
            "{} {} -> {} | {}ms | {} bytes",
            method,
            uri.path(),
            parts.status.as_u16(),
            elapsed_ms,
            size
        );
    } else {
        tracing::warn!(
            "{} {} -> {} | {}ms | {} bytes",
            method,
            uri.path(),
            parts.status.as_u16(),
            elapsed_ms,
            size
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
