use dnsrelay_domain::wire::{decode_name, MAX_UDP_MESSAGE_LEN};
use dnsrelay_domain::{DecodeError, Message, Question, RecordType, ResponseCode, Section};

mod helpers;
use helpers::*;

fn compressed_response() -> Vec<u8> {
    // Question name lives at offset 12; both answers point back at it.
    MessageBuilder::response(0x1234)
        .question("www.example.com", 1, 1)
        .answer(&pointer(12), 5, 300, &labels_then_pointer(&["cdn"], 16))
        .answer(&labels_then_pointer(&["cdn"], 16), 1, 60, &[93, 184, 216, 34])
        .build()
}

#[test]
fn test_decode_query_example_com() {
    let query = MessageBuilder::query(0xBEEF).question("example.com", 1, 1).build();
    let message = Message::decode(&query, query.len()).unwrap();

    assert_eq!(message.header.id, 0xBEEF);
    assert!(!message.header.is_response());
    assert!(message.header.recursion_desired());
    assert_eq!(message.questions, vec![Question::new("example.com", 1, 1)]);
    assert_eq!(message.header.record_count(), 1);
}

#[test]
fn test_decode_compressed_response() {
    let response = compressed_response();
    let message = Message::decode(&response, response.len()).unwrap();

    assert!(message.header.is_response());
    assert_eq!(message.header.rcode(), ResponseCode::NoError);
    assert_eq!(message.answers.len(), 2);
    assert_eq!(message.answers[0].name, "www.example.com");
    assert_eq!(message.answers[0].record_type(), Some(RecordType::CNAME));
    assert_eq!(message.answers[1].name, "cdn.example.com");
    assert_eq!(message.answers[1].rdata, vec![93, 184, 216, 34]);
    assert_eq!(message.min_answer_ttl(), Some(60));
    assert_eq!(message.wire_len, response.len());
}

#[test]
fn test_rdata_offset_points_into_message() {
    let response = compressed_response();
    let message = Message::decode(&response, response.len()).unwrap();

    for (_, record) in message.records() {
        assert_eq!(&response[record.rdata_offset..record.rdata_end()], record.rdata.as_slice());
    }
}

#[test]
fn test_decode_is_deterministic() {
    let response = compressed_response();
    let first = Message::decode(&response, response.len()).unwrap();
    let second = Message::decode(&response, response.len()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_decode_leaves_buffer_untouched() {
    let response = compressed_response();
    let copy = response.clone();
    let _ = Message::decode(&response, response.len());
    assert_eq!(response, copy);
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let response = compressed_response();
    for n in 0..response.len() {
        assert!(
            Message::decode(&response, n).is_err(),
            "prefix of {n} bytes should not decode"
        );
    }
}

#[test]
fn test_reused_receive_buffer() {
    let response = compressed_response();
    let mut buffer = [0xC0u8; MAX_UDP_MESSAGE_LEN];
    buffer[..response.len()].copy_from_slice(&response);

    let message = Message::decode(&buffer, response.len()).unwrap();
    assert_eq!(message.answers.len(), 2);
}

#[test]
fn test_trailing_octets_are_tolerated() {
    let mut query = MessageBuilder::query(1).question("example.com", 1, 1).build();
    let declared = query.len();
    query.extend_from_slice(&[0xDE, 0xAD]);

    let message = Message::decode(&query, query.len()).unwrap();
    assert_eq!(message.wire_len, declared);
}

#[test]
fn test_declared_additional_missing() {
    let response = MessageBuilder::response(7)
        .question("example.com", 1, 1)
        .answer(&pointer(12), 1, 30, &[1, 2, 3, 4])
        .declare(ADDITIONAL, 1)
        .build();

    assert_eq!(
        Message::decode(&response, response.len()),
        Err(DecodeError::SectionOverrun {
            section: Section::Additional,
            index: 0,
            offset: response.len(),
            available: response.len(),
        })
    );
}

#[test]
fn test_forward_pointer_in_answer_is_rejected() {
    let response = MessageBuilder::response(7)
        .question("example.com", 1, 1)
        .answer(&pointer(200), 1, 30, &[1, 2, 3, 4])
        .build();

    assert!(matches!(
        Message::decode(&response, response.len()),
        Err(DecodeError::CompressionLoop { target: 200, .. })
    ));
}

#[test]
fn test_rdlength_overrun_is_truncated_record() {
    let response = MessageBuilder::response(7)
        .question("example.com", 1, 1)
        .raw(&pointer(12))
        .raw(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x10, 1, 2, 3, 4])
        .declare(ANSWER, 1)
        .build();

    assert!(matches!(
        Message::decode(&response, response.len()),
        Err(DecodeError::TruncatedRecord {
            rdlength: 16,
            available: 4,
            ..
        })
    ));
}

#[test]
fn test_root_question() {
    let query = MessageBuilder::query(2).question(".", 2, 1).build();
    let message = Message::decode(&query, query.len()).unwrap();
    assert_eq!(message.questions[0].name, "");
    assert_eq!(message.questions[0].to_string(), ". NS IN");
}

#[test]
fn test_decode_name_at_question_offset() {
    let query = MessageBuilder::query(3).question("a.b.c", 1, 1).build();
    assert_eq!(decode_name(&query, 12), Ok(("a.b.c".to_string(), 7)));
}

#[test]
fn test_multiple_questions_have_no_single_question() {
    let query = MessageBuilder::query(4)
        .question("a.example", 1, 1)
        .question("b.example", 28, 1)
        .build();
    let message = Message::decode(&query, query.len()).unwrap();
    assert_eq!(message.questions.len(), 2);
    assert!(message.single_question().is_none());
}

#[test]
fn test_servfail_rcode() {
    let response = MessageBuilder::response(5)
        .flags(0x8182)
        .question("example.com", 1, 1)
        .build();
    let message = Message::decode(&response, response.len()).unwrap();
    assert_eq!(message.header.rcode(), ResponseCode::ServFail);
    assert!(message.header.rcode().is_server_error());
}
