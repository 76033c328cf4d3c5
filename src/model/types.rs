pub(crate) type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
