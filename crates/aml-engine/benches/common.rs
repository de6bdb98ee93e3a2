// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_message(size: usize) -> String {
    let base = "<sarcasm>Sure, *that* will work</sarcasm> said [[Alice|she]].\n\
                <technical>The <<fn main()>> entry point <blue>(see https://example.com/docs)</blue></technical>\n\
                你好世界 --MORE--\n\
                <chess>1. e4 e5 2. Nf3 Nc6 3. Bb5 a6</chess>\n\
                ----\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested(depth: usize) -> String {
    let mut content = String::new();
    for _ in 0..depth {
        content.push_str("<green>*level* ");
    }
    content.push_str("core");
    for _ in 0..depth {
        content.push_str(" done</green>");
    }
    content
}
