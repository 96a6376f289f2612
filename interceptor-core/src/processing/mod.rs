pub mod graph;
pub mod pcm_codec;
pub mod render_queue;
pub mod wav_format;
