use std::path::Path;

const LOG_CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    let config_file = Path::new(LOG_CONFIG_FILE);
    if !config_file.is_file() {
        return;
    }
    if let Err(e) = log4rs::init_file(config_file, Default::default()) {
        eprintln!("Logging disabled, unable to load {}: {}", LOG_CONFIG_FILE, e);
    }
}

pub fn log_words(label: &str, words: &[u32], total_bits: usize) {
    fn get_word_array(words: &[u32]) -> Vec<String> {
        words.iter().map(|word| format!("{:08X}", word)).collect()
    }
    log::debug!(
        "{} ({} bits in {} words)\n{:?}",
        label,
        total_bits,
        words.len(),
        get_word_array(words)
    );
}
