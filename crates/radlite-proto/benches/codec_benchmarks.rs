use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use radlite_proto::attributes::standard;
use radlite_proto::auth::{generate_request_authenticator, hide_user_password, recover_user_password};
use radlite_proto::{Attribute, Code, Dictionary, Packet};

const SECRET: &[u8] = b"testing123";

fn test_packet(num_attributes: usize) -> Packet {
    let authenticator = generate_request_authenticator();
    let mut packet = Packet::new(Code::AccessRequest, 1, authenticator);

    packet.add_attribute(Attribute::string(standard::USER_NAME, "testuser"));
    let hidden = hide_user_password(b"testpassword", SECRET, &authenticator)
        .expect("failed to hide password");
    packet.add_attribute(Attribute::octets(standard::USER_PASSWORD, hidden));

    for i in 0..num_attributes {
        packet.add_attribute(Attribute::string(
            standard::REPLY_MESSAGE,
            format!("attribute_{i}"),
        ));
    }

    packet
}

fn bench_packet_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_encode");

    for num_attrs in [0usize, 5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attrs),
            num_attrs,
            |b, &num_attrs| {
                let packet = test_packet(num_attrs);
                b.iter(|| packet.encode(SECRET, None).expect("failed to encode"));
            },
        );
    }

    group.finish();
}

fn bench_packet_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_decode");
    let dictionary = Dictionary::standard();

    for num_attrs in [0usize, 5, 10, 20].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_attrs),
            num_attrs,
            |b, &num_attrs| {
                let encoded = test_packet(num_attrs)
                    .encode(SECRET, None)
                    .expect("failed to encode");
                b.iter(|| {
                    Packet::decode(black_box(&encoded), &dictionary).expect("failed to decode")
                });
            },
        );
    }

    group.finish();
}

fn bench_password_hiding(c: &mut Criterion) {
    let mut group = c.benchmark_group("password_hiding");

    let passwords: &[(&str, &[u8])] = &[
        ("short", b"test"),
        ("medium", b"testpassword123"),
        ("long", b"this_is_a_very_long_password_to_test_performance"),
    ];

    for (name, password) in passwords {
        group.bench_with_input(BenchmarkId::new("hide", name), password, |b, password| {
            let authenticator = generate_request_authenticator();
            b.iter(|| {
                hide_user_password(black_box(password), black_box(SECRET), &authenticator)
                    .expect("failed to hide")
            });
        });

        group.bench_with_input(BenchmarkId::new("recover", name), password, |b, password| {
            let authenticator = generate_request_authenticator();
            let hidden = hide_user_password(password, SECRET, &authenticator).expect("failed");
            b.iter(|| {
                recover_user_password(black_box(&hidden), black_box(SECRET), &authenticator)
                    .expect("failed to recover")
            });
        });
    }

    group.finish();
}

fn bench_full_request_cycle(c: &mut Criterion) {
    let dictionary = Dictionary::standard();

    c.bench_function("full_request_encode_decode", |b| {
        b.iter(|| {
            let packet = test_packet(0);
            let encoded = packet.encode(SECRET, None).expect("failed to encode");
            let decoded = Packet::decode(&encoded, &dictionary).expect("failed to decode");
            black_box(decoded)
        });
    });
}

criterion_group!(
    benches,
    bench_packet_encode,
    bench_packet_decode,
    bench_password_hiding,
    bench_full_request_cycle
);
criterion_main!(benches);
