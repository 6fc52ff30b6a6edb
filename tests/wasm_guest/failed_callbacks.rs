use proxy_wasm_link::{ Action, DispatchError, HostEmulator, StreamType };
use crate::fixture_loading::{ guest, ENGINE };

#[test]
fn trapped_body_chunk_is_delivered_again() {
	let mut host = HostEmulator::new( guest( &ENGINE, fixture_path!( "flaky_body.wat" )));
	let stream = host.initialize_http_context().expect( "stream" );

	assert_eq!( host.call_on_request_body( stream, b"ab", false ).expect( "first chunk" ), Action::Pause );
	match host.call_on_request_body( stream, b"cd", false ) {
		Err( DispatchError::RuntimeException( _ )) => {}
		other => panic!( "Expected RuntimeException, got: {:#?}", other ),
	}
	assert_eq!( host.get_current_http_stream_action( stream ), Action::Pause );
	assert_eq!( host.get_retained_body( stream, StreamType::Request ), b"abcd" );

	assert_eq!( host.call_on_request_body( stream, b"ef", true ).expect( "last chunk" ), Action::Continue );
	assert_eq!( host.get_current_request_body( stream ), b"abcdef" );
	assert!( host.get_retained_body( stream, StreamType::Request ).is_empty() );
}
