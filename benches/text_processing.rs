use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transcript_lens::transcript::parse_srt;
use transcript_lens::{highlight, parse_quiz, search};

fn quiz_text(blocks: usize) -> String {
    let mut text = String::from("Here is your quiz:\n\n");
    for i in 1..=blocks {
        text.push_str(&format!(
            "Q{i}. What does part {i} of the talk cover?\n\
             a) Ownership and borrowing\n\
             b) Garbage collection\n\
             c) Manual memory management\n\
             d) None of the above\n\
             Correct Answer: a)\n\n"
        ));
    }
    text
}

fn transcript(sentences: usize) -> String {
    (0..sentences)
        .map(|i| match i % 3 {
            0 => format!("Sentence {} talks about the borrow checker.", i),
            1 => format!("Is sentence {} about lifetimes?", i),
            _ => "Rust makes this safe!".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_quiz_parsing(c: &mut Criterion) {
    let small = quiz_text(3);
    c.bench_function("quiz_parse_three_questions", |b| {
        b.iter(|| black_box(parse_quiz(black_box(&small))))
    });

    let large = quiz_text(200);
    c.bench_function("quiz_parse_two_hundred_questions", |b| {
        b.iter(|| black_box(parse_quiz(black_box(&large))))
    });
}

fn bench_search(c: &mut Criterion) {
    let text = transcript(5_000);

    c.bench_function("search_common_keyword", |b| {
        b.iter(|| black_box(search(black_box(&text), "borrow")))
    });

    c.bench_function("search_missing_keyword", |b| {
        b.iter(|| black_box(search(black_box(&text), "async runtime")))
    });

    c.bench_function("highlight_sentence", |b| {
        b.iter(|| black_box(highlight("Borrow, borrow and BORROW again.", "borrow")))
    });
}

fn bench_srt_parsing(c: &mut Criterion) {
    let srt: String = (0..1_000)
        .map(|i| {
            format!(
                "{}\n00:{:02}:{:02},000 --> 00:{:02}:{:02},500\nLine number {}\n\n",
                i + 1,
                (i / 60) % 60,
                i % 60,
                (i / 60) % 60,
                i % 60,
                i
            )
        })
        .collect();

    c.bench_function("srt_parse_thousand_entries", |b| {
        b.iter(|| black_box(parse_srt(black_box(&srt))))
    });
}

criterion_group!(benches, bench_quiz_parsing, bench_search, bench_srt_parsing);
criterion_main!(benches);
