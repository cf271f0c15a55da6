// Webhook Adapters
// 远端自动化流程（n8n webhook）的 HTTP 适配器

mod http;

pub use http::*;
