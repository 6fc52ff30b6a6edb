use proxy_wasm_link::{ DispatchError, HostEmulator, Module, WasmGuest };
use crate::fixture_loading::ENGINE ;

#[test]
fn context_create_is_required() {
	let module = Module::new( &ENGINE, r#"(module (memory (export "memory") 1))"# ).expect( "failed to compile module" );
	let mut host = HostEmulator::new( WasmGuest::new( &ENGINE, &module ).expect( "failed to instantiate guest" ));

	match host.start_plugin() {
		Err( DispatchError::MissingExport( name )) => assert_eq!( name, "proxy_on_context_create" ),
		other => panic!( "Expected MissingExport, got: {:#?}", other ),
	}
}

#[test]
fn imports_outside_the_abi_trap_when_called() {
	let module = Module::new( &ENGINE, r#"(module
		(import "env" "fd_write" (func $fd_write (param i32 i32 i32 i32) (result i32)))
		(memory (export "memory") 1)
		(func (export "proxy_on_context_create") (param i32 i32))
		(func (export "proxy_on_tick") (param i32)
			(drop (call $fd_write (i32.const 1) (i32.const 0) (i32.const 0) (i32.const 0))))
	)"# ).expect( "failed to compile module" );
	let mut host = HostEmulator::new( WasmGuest::new( &ENGINE, &module ).expect( "unknown imports still link" ));

	assert!( host.start_plugin().expect( "configure defaults to success" ));
	match host.tick() {
		Err( DispatchError::RuntimeException( _ )) => {}
		other => panic!( "Expected RuntimeException, got: {:#?}", other ),
	}
}
