mod engine;
mod settings;
