mod telegram_client;

pub use telegram_client::TelegramClient;
