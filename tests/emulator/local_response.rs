use proxy_wasm_link::{ Action, Context, Dispatcher, HeaderMap, HostEmulator, Hostcalls, HttpContext };

/// Answers unauthenticated requests itself.
struct RequireAuth ;

impl Context for RequireAuth {}

impl HttpContext for RequireAuth {
	fn on_http_request_headers( &mut self, host: &mut Hostcalls<'_>, _num_headers: usize, _end_of_stream: bool ) -> Action {
		if host.get_http_request_header( "authorization" ).is_ok() { return Action::Continue }
		let headers = HeaderMap::from_pairs([( "www-authenticate", "Bearer" )]);
		let _ = host.send_local_response( 401, "missing_credentials", &headers, b"denied", None );
		Action::Pause
	}
}

fn emulator() -> HostEmulator {
	HostEmulator::new( Dispatcher::for_http(| _ | RequireAuth ))
}

#[test]
fn local_response_is_recorded() {
	let mut host = emulator();
	let stream = host.initialize_http_context().expect( "stream" );

	let action = host.call_on_request_headers( stream, [( ":path", "/admin" )], true ).expect( "headers" );

	assert_eq!( action, Action::Pause );
	let response = host.get_sent_local_response( stream ).expect( "a local response" );
	assert_eq!( response.status_code, 401 );
	assert_eq!( response.status_code_detail, "missing_credentials" );
	assert_eq!( response.body, b"denied" );
	assert_eq!( response.headers.get( "www-authenticate" ), Some( "Bearer" ));
	assert_eq!( response.grpc_status, None );
}

#[test]
fn no_local_response_when_passing_through() {
	let mut host = emulator();
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" ), ( "authorization", "Bearer t" )], true ).expect( "headers" );
	assert!( host.get_sent_local_response( stream ).is_none() );
}
