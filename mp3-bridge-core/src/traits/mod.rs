pub mod codec_engine;
