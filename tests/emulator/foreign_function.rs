use proxy_wasm_link::{ EmulatorOptions, HostError, HostSession, HostState, Hostcalls, ROOT_CONTEXT_ID };

fn with_host<T>( state: &mut HostState, call: impl FnOnce( &mut Hostcalls<'_> ) -> T ) -> T {
	let mut session = HostSession::new( state, ROOT_CONTEXT_ID );
	call( &mut Hostcalls::new( &mut session ))
}

fn options() -> EmulatorOptions {
	let mut calls = 0_u32 ;
	EmulatorOptions::new()
		.with_foreign_function( "echo", | params | Ok( params.to_vec() ))
		.with_foreign_function( "count", move | _ | { calls += 1 ; Ok( calls.to_string().into_bytes() ) })
		.with_foreign_function( "fail", | _ | Err( HostError::Unimplemented ))
}

#[test]
fn registered_functions_are_called() {
	let mut state = HostState::from( options() );
	with_host( &mut state, | host | {
		assert_eq!( host.call_foreign_function( "echo", b"ping" ), Ok( b"ping".to_vec() ));
		assert_eq!( host.call_foreign_function( "count", b"" ), Ok( b"1".to_vec() ));
		assert_eq!( host.call_foreign_function( "count", b"" ), Ok( b"2".to_vec() ));
	});
}

#[test]
fn function_errors_pass_through() {
	let mut state = HostState::from( options() );
	assert_eq!( with_host( &mut state, | host | host.call_foreign_function( "fail", b"" )), Err( HostError::Unimplemented ));
}

#[test]
fn unknown_functions_are_not_found() {
	let mut state = HostState::from( options() );
	assert_eq!( with_host( &mut state, | host | host.call_foreign_function( "missing", b"" )), Err( HostError::NotFound ));
}
