use proxy_wasm_link::{ Action, DispatchError, EmulatorOptions, HostEmulator, WasmGuest };
use crate::fixture_loading::{ guest, ENGINE };

fn emulator() -> HostEmulator<WasmGuest> {
	HostEmulator::with_options( guest( &ENGINE, fixture_path!( "header_filter.wat" )), EmulatorOptions::new() )
}

#[test]
fn action_outside_the_abi_is_rejected() {
	let mut host = emulator();
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" )], false ).expect( "request headers" );

	match host.call_on_response_headers( stream, [( ":status", "200" )], false ) {
		Err( DispatchError::InvalidReturn( "proxy_on_response_headers", 7 )) => {}
		other => panic!( "Expected InvalidReturn, got: {:#?}", other ),
	}
	assert_eq!( host.get_current_http_stream_action( stream ), Action::Continue );
}

#[test]
fn failed_host_call_status_reaches_the_guest() {
	let mut host = emulator();
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" )], false ).expect( "request headers" );

	// The guest returns the status of switching to an unknown context.
	match host.call_on_request_trailers( stream, [( "grpc-status", "0" )]) {
		Err( DispatchError::InvalidReturn( "proxy_on_request_trailers", 2 )) => {}
		other => panic!( "Expected InvalidReturn, got: {:#?}", other ),
	}
}
