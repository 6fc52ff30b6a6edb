use proxy_wasm_link::{ decode_map, encode_map, HostError };

#[test]
fn encodes_lengths_before_interleaved_data() {
	let encoded = encode_map( &[( "a", "1" ), ( "bb", "22" )]);
	let expected: Vec<u8> = [
		&2u32.to_le_bytes()[..],
		&1u32.to_le_bytes(), &1u32.to_le_bytes(),
		&2u32.to_le_bytes(), &2u32.to_le_bytes(),
		b"a\x001\x00bb\x0022\x00",
	].concat();
	assert_eq!( encoded, expected );
}

#[test]
fn empty_map_is_a_bare_count() {
	let encoded = encode_map::<&str, &str>( &[] );
	assert_eq!( encoded, 0u32.to_le_bytes() );
	assert_eq!( decode_map( &encoded ), Ok( Vec::new() ));
}

#[test]
fn empty_region_decodes_to_empty_map() {
	assert_eq!( decode_map( &[] ), Ok( Vec::new() ));
}

#[test]
fn decoding_keeps_order_and_repeated_keys() {
	let pairs = vec![
		( "b".to_string(), "2".to_string() ),
		( "a".to_string(), String::new() ),
		( "b".to_string(), "3".to_string() ),
	];
	assert_eq!( decode_map( &encode_map( &pairs )), Ok( pairs ));
}

#[test]
fn count_larger_than_region_is_bad_argument() {
	assert_eq!( decode_map( &5u32.to_le_bytes() ), Err( HostError::BadArgument ));
	assert_eq!( decode_map( &u32::MAX.to_le_bytes() ), Err( HostError::BadArgument ));
}

#[test]
fn missing_terminator_is_serialization_failure() {
	let mut encoded = encode_map( &[( "k", "v" )]);
	// count, two lengths, then `k` at 12 and its terminator at 13
	encoded[13] = b'x' ;
	assert_eq!( decode_map( &encoded ), Err( HostError::SerializationFailure ));
}

#[test]
fn truncated_data_is_serialization_failure() {
	let region: Vec<u8> = [
		&1u32.to_le_bytes()[..],
		&5u32.to_le_bytes(), &0u32.to_le_bytes(),
		b"a\x00",
	].concat();
	assert_eq!( decode_map( &region ), Err( HostError::SerializationFailure ));
}

#[test]
fn non_utf8_key_is_serialization_failure() {
	let encoded = encode_map( &[( [ 0xff_u8 ].as_slice(), b"v".as_slice() )]);
	assert_eq!( decode_map( &encoded ), Err( HostError::SerializationFailure ));
}
